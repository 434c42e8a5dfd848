//! Stale approvals and approval-session counters.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use sam_core::entities::{ApprovalProspect, ApprovalSession, Campaign, CampaignProspect};
use sam_core::enums::{CampaignStatus, ProspectStatus, Severity};
use sam_core::issues::Issue;

use super::CheckOutcome;
use super::queue::PROSPECTS_TABLE;
use crate::plan::Patch;

pub const SESSIONS_TABLE: &str = "prospect_approval_sessions";

/// Prospects left `pending` for more than `stale_days`.
///
/// Only prospects of an `active` campaign are auto-approved; the rest are
/// reported so an operator can decide.
#[must_use]
pub fn check_stale_pending(
    prospects: &[CampaignProspect],
    campaigns: &[Campaign],
    now: DateTime<Utc>,
    stale_days: u32,
) -> CheckOutcome {
    let mut out = CheckOutcome::new("Stale pending prospects");
    let cutoff = now - Duration::days(i64::from(stale_days));
    let campaigns: HashMap<&str, &Campaign> = campaigns.iter().map(|c| (c.id.as_str(), c)).collect();

    for prospect in prospects {
        if prospect.status != ProspectStatus::Pending {
            continue;
        }
        let Some(since) = prospect.created_at.or(prospect.updated_at) else {
            continue;
        };
        if since >= cutoff {
            continue;
        }
        let days = (now - since).num_days();
        let campaign = campaigns.get(prospect.campaign_id.as_str());

        match campaign {
            Some(campaign) if campaign.status == CampaignStatus::Active => {
                out.report.push(Issue::new(
                    Severity::Medium,
                    "stale_pending_prospect",
                    &prospect.id,
                    format!(
                        "Pending for {days} days in active campaign '{}'",
                        campaign.display_name()
                    ),
                ));
                out.plan.push(
                    Patch::new(PROSPECTS_TABLE, &prospect.id, format!("pending for {days} days"))
                        .set("status", ProspectStatus::Approved.as_str()),
                );
            }
            Some(campaign) => out.report.push(Issue::new(
                Severity::Low,
                "stale_pending_inactive_campaign",
                &prospect.id,
                format!(
                    "Pending for {days} days in '{}' campaign '{}'",
                    campaign.status,
                    campaign.display_name()
                ),
            )),
            None => out.report.push(Issue::new(
                Severity::Low,
                "stale_pending_unknown_campaign",
                &prospect.id,
                format!(
                    "Pending for {days} days; campaign {} was not loaded",
                    prospect.campaign_id
                ),
            )),
        }
    }

    out.finish()
}

/// Counters recomputed from `prospect_approval_data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounts {
    pub total: u32,
    pub approved: u32,
    pub rejected: u32,
    pub pending: u32,
}

impl SessionCounts {
    /// Tally rows; a null or unrecognized status counts as pending.
    #[must_use]
    pub fn tally<'a>(rows: impl IntoIterator<Item = &'a ApprovalProspect>) -> Self {
        let mut counts = Self::default();
        for row in rows {
            counts.total += 1;
            match row
                .approval_status
                .as_deref()
                .map(|s| s.trim().to_ascii_lowercase())
                .as_deref()
            {
                Some("approved") => counts.approved += 1,
                Some("rejected") => counts.rejected += 1,
                _ => counts.pending += 1,
            }
        }
        counts
    }

    #[must_use]
    pub const fn stored(session: &ApprovalSession) -> Self {
        Self {
            total: session.total_prospects,
            approved: session.approved_count,
            rejected: session.rejected_count,
            pending: session.pending_count,
        }
    }
}

/// Sessions whose stored counters disagree with their rows.
#[must_use]
pub fn check_session_counters(sessions: &[ApprovalSession], rows: &[ApprovalProspect]) -> CheckOutcome {
    let mut out = CheckOutcome::new("Approval session counters");
    let mut by_session: HashMap<&str, Vec<&ApprovalProspect>> = HashMap::new();
    for row in rows {
        by_session.entry(row.session_id.as_str()).or_default().push(row);
    }

    for session in sessions {
        let actual = SessionCounts::tally(
            by_session
                .get(session.id.as_str())
                .into_iter()
                .flatten()
                .copied(),
        );
        let stored = SessionCounts::stored(session);
        if actual == stored {
            continue;
        }
        out.report.push(Issue::new(
            Severity::Medium,
            "session_counter_mismatch",
            &session.id,
            format!(
                "Stored total/approved/rejected/pending {}/{}/{}/{} but rows say {}/{}/{}/{}",
                stored.total,
                stored.approved,
                stored.rejected,
                stored.pending,
                actual.total,
                actual.approved,
                actual.rejected,
                actual.pending
            ),
        ));
        out.plan.push(
            Patch::new(SESSIONS_TABLE, &session.id, "recount from approval rows")
                .set("total_prospects", actual.total)
                .set("approved_count", actual.approved)
                .set("rejected_count", actual.rejected)
                .set("pending_count", actual.pending),
        );
    }

    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{campaign, prospect, ts};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(id: &str, session: &str, status: Option<&str>) -> ApprovalProspect {
        ApprovalProspect {
            id: id.into(),
            session_id: session.into(),
            prospect_id: None,
            name: None,
            approval_status: status.map(str::to_string),
            created_at: None,
        }
    }

    fn session(id: &str, total: u32, approved: u32, rejected: u32, pending: u32) -> ApprovalSession {
        ApprovalSession {
            id: id.into(),
            workspace_id: Some("ws-1".into()),
            user_id: None,
            status: Some("active".into()),
            total_prospects: total,
            approved_count: approved,
            rejected_count: rejected,
            pending_count: pending,
            created_at: None,
        }
    }

    #[test]
    fn auto_approves_only_in_active_campaigns() {
        let now = ts("2025-10-14T12:00:00Z");
        let mut fresh = prospect("fresh", ProspectStatus::Pending);
        fresh.created_at = Some(ts("2025-10-13T12:00:00Z"));
        let old = prospect("old", ProspectStatus::Pending);
        let mut paused_old = prospect("paused-old", ProspectStatus::Pending);
        paused_old.campaign_id = "cmp-2".into();
        let approved = prospect("done", ProspectStatus::Approved);

        let campaigns = [
            campaign("cmp-1", CampaignStatus::Active),
            campaign("cmp-2", CampaignStatus::Paused),
        ];
        let out = check_stale_pending(&[fresh, old, paused_old, approved], &campaigns, now, 3);

        let codes: Vec<_> = out.report.issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["stale_pending_prospect", "stale_pending_inactive_campaign"]);
        assert_eq!(out.plan.len(), 1);
        assert_eq!(out.plan.patches[0].id, "old");
        assert_eq!(out.plan.patches[0].get("status"), Some(&json!("approved")));
        assert!(out.report.issues[0].description.contains("13 days"));
    }

    #[test]
    fn prospects_without_timestamps_are_skipped() {
        let mut p = prospect("p1", ProspectStatus::Pending);
        p.created_at = None;
        let out = check_stale_pending(&[p], &[], ts("2025-10-14T12:00:00Z"), 3);
        assert!(out.report.is_clean());
    }

    #[test]
    fn tally_treats_null_as_pending() {
        let rows = [
            row("a", "s1", Some("approved")),
            row("b", "s1", Some("REJECTED")),
            row("c", "s1", None),
            row("d", "s1", Some("pending")),
        ];
        assert_eq!(
            SessionCounts::tally(&rows),
            SessionCounts {
                total: 4,
                approved: 1,
                rejected: 1,
                pending: 2
            }
        );
    }

    #[test]
    fn patches_mismatched_sessions_only() {
        let rows = [
            row("a", "s1", Some("approved")),
            row("b", "s1", Some("approved")),
            row("c", "s2", Some("rejected")),
        ];
        let sessions = [session("s1", 2, 0, 0, 2), session("s2", 1, 0, 1, 0), session("s3", 5, 5, 0, 0)];
        let out = check_session_counters(&sessions, &rows);

        let ids: Vec<_> = out.plan.patches.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3"]);
        assert_eq!(out.plan.patches[0].get("approved_count"), Some(&json!(2)));
        assert_eq!(out.plan.patches[0].get("pending_count"), Some(&json!(0)));
        assert_eq!(out.plan.patches[1].get("total_prospects"), Some(&json!(0)));
    }
}
