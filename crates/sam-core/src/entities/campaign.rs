use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::enums::CampaignStatus;

/// An outreach sequence targeting prospects through one connected account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: String,
    pub workspace_id: String,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: CampaignStatus,
    pub campaign_type: Option<String>,
    /// Unipile account id the campaign sends from.
    pub linkedin_account_id: Option<String>,
    pub message_templates: Option<MessageTemplates>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// The `campaigns.message_templates` JSON column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageTemplates {
    pub connection_request: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub follow_up_messages: Vec<String>,
    pub alternative_message: Option<String>,
}

impl MessageTemplates {
    /// Connection request text, if present and not blank.
    #[must_use]
    pub fn connection_request(&self) -> Option<&str> {
        self.connection_request
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Follow-up `n` (zero based), or an empty string.
    #[must_use]
    pub fn follow_up(&self, n: usize) -> &str {
        self.follow_up_messages.get(n).map_or("", String::as_str)
    }

    /// Alternative (acceptance) message, falling back to the first follow-up.
    #[must_use]
    pub fn alternative(&self) -> &str {
        self.alternative_message
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| self.follow_up(0))
    }
}
