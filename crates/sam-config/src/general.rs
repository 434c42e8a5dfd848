//! Thresholds and defaults shared by all commands.

use serde::{Deserialize, Serialize};

const fn default_limit() -> u32 {
    20
}

const fn default_stale_pending_days() -> u32 {
    3
}

const fn default_stuck_queue_hours() -> u32 {
    24
}

const fn default_stale_draft_hours() -> u32 {
    48
}

const fn default_batch_size() -> usize {
    5
}

/// Three minutes between webhook batches.
const fn default_batch_delay_secs() -> u64 {
    180
}

const fn default_daily_message_limit() -> u32 {
    20
}

fn default_journal_dir() -> String {
    ".samops/journal".to_string()
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default row limit for list commands and launches.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Days a prospect may sit in `pending` before it counts as stale.
    #[serde(default = "default_stale_pending_days")]
    pub stale_pending_days: u32,

    /// Hours a prospect may sit in `queued_in_n8n` before it counts as stuck.
    #[serde(default = "default_stuck_queue_hours")]
    pub stuck_queue_hours: u32,

    /// Hours a reply draft may wait for review.
    #[serde(default = "default_stale_draft_hours")]
    pub stale_draft_hours: u32,

    /// Prospects per launch webhook call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_batch_delay_secs")]
    pub batch_delay_secs: u64,

    /// Per-account daily limit when the account row has none.
    #[serde(default = "default_daily_message_limit")]
    pub daily_message_limit: u32,

    /// Directory for mutation journal files.
    #[serde(default = "default_journal_dir")]
    pub journal_dir: String,

    /// IANA timezone name forwarded to the sender's schedule settings.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            stale_pending_days: default_stale_pending_days(),
            stuck_queue_hours: default_stuck_queue_hours(),
            stale_draft_hours: default_stale_draft_hours(),
            batch_size: default_batch_size(),
            batch_delay_secs: default_batch_delay_secs(),
            daily_message_limit: default_daily_message_limit(),
            journal_dir: default_journal_dir(),
            timezone: default_timezone(),
        }
    }
}
