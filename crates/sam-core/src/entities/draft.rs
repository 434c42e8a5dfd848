use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A `reply_agent_drafts` row: a suggested reply awaiting human approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyDraft {
    pub id: String,
    pub workspace_id: Option<String>,
    pub campaign_id: Option<String>,
    pub prospect_id: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    pub draft_text: Option<String>,
}

impl ReplyDraft {
    /// Still waiting on a reviewer.
    #[must_use]
    pub fn is_awaiting_review(&self) -> bool {
        self.status.as_deref().is_some_and(|status| {
            matches!(
                status.to_ascii_lowercase().as_str(),
                "draft" | "pending" | "pending_approval"
            )
        })
    }
}
