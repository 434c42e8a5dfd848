use serde::{Deserialize, Serialize};

/// A `workspace_accounts` row linking a workspace user to a Unipile account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceAccount {
    pub id: String,
    pub workspace_id: String,
    pub user_id: Option<String>,
    pub account_type: Option<String>,
    pub unipile_account_id: Option<String>,
    pub account_name: Option<String>,
    pub connection_status: Option<String>,
    pub is_active: Option<bool>,
    pub daily_message_limit: Option<u32>,
    pub messages_sent_today: Option<u32>,
    /// Date (or timestamp) of the last counted send.
    pub last_message_date: Option<String>,
}

impl WorkspaceAccount {
    #[must_use]
    pub fn is_linkedin(&self) -> bool {
        self.account_type
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("linkedin"))
    }

    /// Marked disconnected locally.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.connection_status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("disconnected"))
    }
}
