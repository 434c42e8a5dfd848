use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::enums::QueueStatus;

/// A `send_queue` row: one scheduled outbound message for one prospect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendQueueItem {
    pub id: String,
    pub campaign_id: String,
    pub prospect_id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: QueueStatus,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub sent_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}
