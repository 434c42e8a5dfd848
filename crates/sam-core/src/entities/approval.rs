use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A `prospect_approval_sessions` row: one uploaded batch awaiting review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovalSession {
    pub id: String,
    pub workspace_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_prospects: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub approved_count: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub rejected_count: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub pending_count: u32,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A `prospect_approval_data` row: one contact inside an approval session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovalProspect {
    pub id: String,
    pub session_id: String,
    pub prospect_id: Option<String>,
    pub name: Option<String>,
    /// `approved`, `rejected`, `pending` (null counts as pending).
    pub approval_status: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}
