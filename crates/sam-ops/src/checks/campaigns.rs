//! Campaign health snapshot and stuck-prospect reset.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use sam_core::classify::{ErrorCategory, tally};
use sam_core::entities::{Campaign, CampaignProspect, SendQueueItem};
use sam_core::enums::{ProspectStatus, Severity};
use sam_core::issues::Issue;

use super::CheckOutcome;
use super::queue::PROSPECTS_TABLE;
use crate::plan::Patch;

/// Counts for one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignHealth {
    pub campaign_id: String,
    pub campaign_name: String,
    pub campaign_status: String,
    pub prospects_total: usize,
    pub prospects_by_status: BTreeMap<String, usize>,
    pub queue_by_status: BTreeMap<String, usize>,
    pub failures_by_category: BTreeMap<ErrorCategory, usize>,
    /// Prospects sitting in `queued_in_n8n` past the cutoff.
    pub stuck: Vec<String>,
}

impl CampaignHealth {
    /// Prospects that reached the recipient.
    #[must_use]
    pub fn contacted(&self) -> usize {
        self.prospects_by_status
            .iter()
            .filter(|(status, _)| ProspectStatus::parse(status).is_contacted())
            .map(|(_, count)| count)
            .sum()
    }
}

fn count_by<'a>(values: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

fn is_stuck(prospect: &CampaignProspect, cutoff: DateTime<Utc>) -> bool {
    prospect.status == ProspectStatus::QueuedInN8n
        && prospect.last_touched().is_some_and(|at| at < cutoff)
}

/// Snapshot prospect and queue counts for `campaign`.
#[must_use]
pub fn campaign_health(
    campaign: &Campaign,
    prospects: &[CampaignProspect],
    queue: &[SendQueueItem],
    now: DateTime<Utc>,
    stuck_hours: u32,
) -> CampaignHealth {
    let cutoff = now - Duration::hours(i64::from(stuck_hours));
    CampaignHealth {
        campaign_id: campaign.id.clone(),
        campaign_name: campaign.display_name().to_string(),
        campaign_status: campaign.status.to_string(),
        prospects_total: prospects.len(),
        prospects_by_status: count_by(prospects.iter().map(|p| p.status.as_str())),
        queue_by_status: count_by(queue.iter().map(|q| q.status.as_str())),
        failures_by_category: tally(
            prospects
                .iter()
                .filter_map(|p| p.error_message.as_deref())
                .filter(|message| !message.trim().is_empty()),
        ),
        stuck: prospects
            .iter()
            .filter(|p| is_stuck(p, cutoff))
            .map(|p| p.id.clone())
            .collect(),
    }
}

/// Prospects stuck in `queued_in_n8n`, with a plan that hands them back to
/// `pending` so the next launch picks them up.
#[must_use]
pub fn check_stuck(
    campaign: &Campaign,
    prospects: &[CampaignProspect],
    now: DateTime<Utc>,
    stuck_hours: u32,
) -> CheckOutcome {
    let mut out = CheckOutcome::new(&format!("Stuck prospects in '{}'", campaign.display_name()));
    let cutoff = now - Duration::hours(i64::from(stuck_hours));

    for prospect in prospects.iter().filter(|p| is_stuck(p, cutoff)) {
        let hours = prospect
            .last_touched()
            .map_or(0, |at| (now - at).num_hours());
        out.report.push(
            Issue::new(
                Severity::Medium,
                "prospect_stuck_in_n8n",
                &prospect.id,
                format!("Queued in N8N for {hours} hours with no result"),
            )
            .with_impact("The workflow dropped this prospect; it will never be contacted"),
        );
        out.plan.push(
            Patch::new(PROSPECTS_TABLE, &prospect.id, format!("stuck for {hours} hours"))
                .set("status", ProspectStatus::Pending.as_str())
                .set("error_message", serde_json::Value::Null),
        );
    }

    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{campaign, prospect, queue_item, ts};
    use pretty_assertions::assert_eq;
    use sam_core::enums::{CampaignStatus, QueueStatus};
    use serde_json::json;

    fn fixture() -> Vec<CampaignProspect> {
        let mut stuck = prospect("stuck", ProspectStatus::QueuedInN8n);
        stuck.updated_at = Some(ts("2025-10-12T12:00:00Z"));
        let mut recent = prospect("recent", ProspectStatus::QueuedInN8n);
        recent.updated_at = Some(ts("2025-10-14T10:00:00Z"));
        let mut failed = prospect("failed", ProspectStatus::Failed);
        failed.error_message = Some("Too many requests".into());
        let mut limited = prospect("limited", ProspectStatus::WeeklyLimitExceeded);
        limited.error_message = Some("weekly limit reached".into());
        vec![
            stuck,
            recent,
            failed,
            limited,
            prospect("sent", ProspectStatus::ConnectionRequestSent),
            prospect("replied", ProspectStatus::Replied),
        ]
    }

    #[test]
    fn health_counts() {
        let c = campaign("cmp-1", CampaignStatus::Active);
        let queue = [
            queue_item("q1", "sent", QueueStatus::Sent),
            queue_item("q2", "failed", QueueStatus::Failed),
            queue_item("q3", "stuck", QueueStatus::Pending),
        ];
        let health = campaign_health(&c, &fixture(), &queue, ts("2025-10-14T12:00:00Z"), 24);

        assert_eq!(health.prospects_total, 6);
        assert_eq!(health.prospects_by_status.get("queued_in_n8n"), Some(&2));
        assert_eq!(health.queue_by_status.get("sent"), Some(&1));
        assert_eq!(health.failures_by_category.get(&ErrorCategory::DailyLimit), Some(&1));
        assert_eq!(health.failures_by_category.get(&ErrorCategory::WeeklyLimit), Some(&1));
        assert_eq!(health.stuck, vec!["stuck".to_string()]);
        assert_eq!(health.contacted(), 2);

        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(value["failures_by_category"]["weekly_limit"], json!(1));
    }

    #[test]
    fn stuck_plan_resets_to_pending() {
        let c = campaign("cmp-1", CampaignStatus::Active);
        let out = check_stuck(&c, &fixture(), ts("2025-10-14T12:00:00Z"), 24);
        assert_eq!(out.report.issues.len(), 1);
        assert!(out.report.issues[0].description.contains("48 hours"));
        let patch = &out.plan.patches[0];
        assert_eq!(patch.id, "stuck");
        assert_eq!(patch.get("status"), Some(&json!("pending")));
        assert_eq!(patch.get("error_message"), Some(&serde_json::Value::Null));
    }
}
