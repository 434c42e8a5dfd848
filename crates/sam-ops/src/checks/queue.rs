//! Send-queue vs prospect status consistency.
//!
//! A `sent` queue row means the connection request went out, so the prospect
//! must be in a contacted status. A `failed` row means the prospect should
//! carry the failure instead of waiting forever.

use std::collections::{HashMap, HashSet};

use sam_core::classify::classify;
use sam_core::entities::{CampaignProspect, SendQueueItem};
use sam_core::enums::{ProspectStatus, QueueStatus, Severity};
use sam_core::issues::Issue;

use super::CheckOutcome;
use crate::plan::Patch;

pub const PROSPECTS_TABLE: &str = "campaign_prospects";

/// Compare one campaign's prospects with its send-queue rows.
#[must_use]
pub fn check_queue(
    campaign_id: &str,
    prospects: &[CampaignProspect],
    queue: &[SendQueueItem],
) -> CheckOutcome {
    let mut out = CheckOutcome::new(&format!("Queue consistency for campaign {campaign_id}"));

    let known: HashSet<&str> = prospects.iter().map(|p| p.id.as_str()).collect();
    let mut by_prospect: HashMap<&str, Vec<&SendQueueItem>> = HashMap::new();
    for item in queue {
        if known.contains(item.prospect_id.as_str()) {
            by_prospect.entry(item.prospect_id.as_str()).or_default().push(item);
        } else {
            out.report.push(Issue::new(
                Severity::Low,
                "orphan_queue_item",
                &item.id,
                format!(
                    "Queue item points at prospect {} which is not in this campaign",
                    item.prospect_id
                ),
            ));
        }
    }

    for prospect in prospects {
        let items = by_prospect.get(prospect.id.as_str()).map_or(&[][..], Vec::as_slice);
        check_prospect(prospect, items, &mut out);
    }

    out.finish()
}

fn check_prospect(prospect: &CampaignProspect, items: &[&SendQueueItem], out: &mut CheckOutcome) {
    if items.is_empty() {
        if prospect.status.is_contacted() {
            out.report.push(Issue::new(
                Severity::Info,
                "contacted_without_queue_item",
                &prospect.id,
                format!(
                    "Prospect is '{}' but has no send-queue row (sent outside the queue)",
                    prospect.status
                ),
            ));
        }
        return;
    }

    let latest = |status: &QueueStatus| {
        items
            .iter()
            .filter(|item| &item.status == status)
            .max_by_key(|item| item.sent_at.or(item.created_at))
            .copied()
    };
    let pending = items
        .iter()
        .filter(|item| item.status == QueueStatus::Pending)
        .count();

    if let Some(sent) = latest(&QueueStatus::Sent) {
        if !prospect.status.is_contacted() {
            out.report.push(
                Issue::new(
                    Severity::High,
                    "queue_sent_prospect_not_contacted",
                    &prospect.id,
                    format!(
                        "Queue item {} is sent but prospect is still '{}'",
                        sent.id, prospect.status
                    ),
                )
                .with_impact("Prospect may be contacted twice"),
            );
            let mut patch = Patch::new(PROSPECTS_TABLE, &prospect.id, "queue item already sent")
                .set("status", ProspectStatus::ConnectionRequestSent.as_str());
            if let Some(sent_at) = sent.sent_at {
                patch = patch.set("contacted_at", sent_at.to_rfc3339());
            }
            out.plan.push(patch);
        }
    } else if let Some(failed) = latest(&QueueStatus::Failed) {
        if pending == 0 && prospect.status.is_awaiting_send() {
            let error = failed.error_message.as_deref().unwrap_or_default();
            let status = classify(error).suggested_prospect_status();
            out.report.push(Issue::new(
                Severity::Medium,
                "queue_failed_prospect_waiting",
                &prospect.id,
                format!(
                    "Queue item {} failed but prospect is still '{}'",
                    failed.id, prospect.status
                ),
            ));
            let mut patch = Patch::new(PROSPECTS_TABLE, &prospect.id, "queue item failed")
                .set("status", status.as_str());
            if let Some(message) = failed.error_message.as_deref() {
                patch = patch.set("error_message", message);
            }
            out.plan.push(patch);
        }
    }

    if pending > 1 {
        out.report.push(Issue::new(
            Severity::Medium,
            "duplicate_pending_queue_items",
            &prospect.id,
            format!("{pending} pending queue items scheduled for the same prospect"),
        ));
    }
}
