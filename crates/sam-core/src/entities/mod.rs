//! Row structs for the SAM platform tables this tool reads and patches.
//!
//! The schema is owned by the platform, not by samops, so the structs are
//! deliberately lenient: unknown columns are ignored, every non-key column is
//! optional or defaulted, and timestamps accept both zoned and naive forms.

mod account;
mod approval;
mod campaign;
mod draft;
mod prospect;
mod queue;
mod workspace;

pub use account::WorkspaceAccount;
pub use approval::{ApprovalProspect, ApprovalSession};
pub use campaign::{Campaign, MessageTemplates};
pub use draft::ReplyDraft;
pub use prospect::CampaignProspect;
pub use queue::SendQueueItem;
pub use workspace::{AuthUser, Workspace, WorkspaceMember};

#[cfg(test)]
pub(crate) use prospect::fixtures;

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default instead of failing.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Lenient timestamp parsing for columns that may be `timestamptz`,
/// `timestamp` or `date`.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Parse a timestamp string. Naive values are taken as UTC.
    #[must_use]
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.with_timezone(&Utc));
        }
        // Postgres text output uses a space separator and a short offset.
        if let Ok(value) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
            return Some(value.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(value.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|value| value.and_utc())
    }

    /// Serde adapter for `Option<DateTime<Utc>>` fields.
    ///
    /// # Errors
    ///
    /// Fails only when the value is neither a string nor null.
    pub fn option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }
}
