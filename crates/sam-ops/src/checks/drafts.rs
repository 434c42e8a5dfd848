//! Reply drafts nobody has reviewed.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use sam_core::entities::ReplyDraft;
use sam_core::enums::Severity;
use sam_core::issues::{Issue, IssueReport};

/// One LOW issue per workspace with drafts awaiting review longer than
/// `stale_hours`. Report only.
#[must_use]
pub fn check_stale_drafts(drafts: &[ReplyDraft], now: DateTime<Utc>, stale_hours: u32) -> IssueReport {
    let mut report = IssueReport::new("Stale reply drafts");
    let cutoff = now - Duration::hours(i64::from(stale_hours));

    let mut by_workspace: BTreeMap<&str, Vec<&ReplyDraft>> = BTreeMap::new();
    for draft in drafts {
        if !draft.is_awaiting_review() || !draft.created_at.is_some_and(|at| at < cutoff) {
            continue;
        }
        let workspace = draft.workspace_id.as_deref().unwrap_or("(no workspace)");
        by_workspace.entry(workspace).or_default().push(draft);
    }

    for (workspace, stale) in by_workspace {
        let oldest_hours = stale
            .iter()
            .filter_map(|d| d.created_at)
            .min()
            .map_or(0, |at| (now - at).num_hours());
        report.push(
            Issue::new(
                Severity::Low,
                "stale_reply_drafts",
                workspace,
                format!(
                    "{} reply drafts awaiting review, oldest {oldest_hours} hours",
                    stale.len()
                ),
            )
            .with_impact("Prospects who replied are waiting on an answer"),
        );
    }
    report
}
