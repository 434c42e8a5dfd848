//! Status enums for rows owned by the SAM platform, plus issue severity.
//!
//! Row statuses are free-form text in the remote schema, so every row status
//! enum is string-backed: known values map to variants (legacy spellings map
//! to their canonical variant), anything else is preserved in `Other`.
//! Serialization always writes the canonical snake_case value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $value:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $variant, )+
            /// A value this tool does not know about, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Canonical string stored in the database.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $value, )+
                    Self::Other(raw) => raw.as_str(),
                }
            }

            /// Lenient parse: case-insensitive, legacy aliases accepted.
            #[must_use]
            pub fn parse(raw: &str) -> Self {
                let normalized = raw.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    $( $value $(| $alias)* => Self::$variant, )+
                    _ => Self::Other(raw.trim().to_string()),
                }
            }

            /// Whether the value was not recognized (including empty/null).
            #[must_use]
            pub const fn is_unknown(&self) -> bool {
                matches!(self, Self::Other(_))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::Other(String::new())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(raw))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// ProspectStatus
// ---------------------------------------------------------------------------

string_enum! {
    /// Status of a `campaign_prospects` row.
    ///
    /// ```text
    /// pending → approved → queued_in_n8n → connection_request_sent → connected → replied
    ///                                    → failed | daily_limit_exceeded | weekly_limit_exceeded
    ///                                    → already_invited | cr_not_accepted
    /// ```
    ProspectStatus {
        Pending => "pending",
        Approved => "approved",
        QueuedInN8n => "queued_in_n8n",
        ConnectionRequestSent => "connection_request_sent" | "cr_sent" | "connection_requested",
        Connected => "connected",
        Replied => "replied",
        Failed => "failed",
        DailyLimitExceeded => "daily_limit_exceeded",
        WeeklyLimitExceeded => "weekly_limit_exceeded",
        CrNotAccepted => "cr_not_accepted",
        AlreadyInvited => "already_invited",
    }
}

impl ProspectStatus {
    /// The prospect has received at least a connection request.
    ///
    /// Follow-up markers written by the sequencer (`fu1_sent` .. `fu5_sent`)
    /// also count as contacted.
    #[must_use]
    pub fn is_contacted(&self) -> bool {
        match self {
            Self::ConnectionRequestSent | Self::Connected | Self::Replied => true,
            Self::Other(raw) => raw.starts_with("fu") && raw.ends_with("_sent"),
            _ => false,
        }
    }

    /// Still waiting to be handed to the sender.
    #[must_use]
    pub const fn is_awaiting_send(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved | Self::QueuedInN8n)
    }
}

// ---------------------------------------------------------------------------
// QueueStatus
// ---------------------------------------------------------------------------

string_enum! {
    /// Status of a `send_queue` row.
    QueueStatus {
        Pending => "pending" | "scheduled",
        Sent => "sent",
        Failed => "failed",
        Skipped => "skipped" | "cancelled",
    }
}

// ---------------------------------------------------------------------------
// CampaignStatus
// ---------------------------------------------------------------------------

string_enum! {
    /// Status of a `campaigns` row.
    CampaignStatus {
        Draft => "draft",
        Active => "active",
        Paused => "paused",
        Completed => "completed",
        Archived => "archived",
    }
}

impl CampaignStatus {
    /// A campaign that can still be launched or resumed.
    #[must_use]
    pub const fn is_launchable(&self) -> bool {
        matches!(self, Self::Draft | Self::Active | Self::Paused)
    }
}

// ---------------------------------------------------------------------------
// MemberRole / MemberStatus
// ---------------------------------------------------------------------------

string_enum! {
    /// Role of a `workspace_members` row.
    MemberRole {
        Owner => "owner",
        Admin => "admin",
        Member => "member",
        Viewer => "viewer",
    }
}

impl MemberRole {
    /// Owners and admins can manage campaigns.
    #[must_use]
    pub const fn has_full_access(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

string_enum! {
    /// Status of a `workspace_members` row.
    MemberStatus {
        Active => "active",
        Invited => "invited" | "pending",
        Suspended => "suspended",
        Removed => "removed",
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of a consistency issue. Ordered: `info < low < medium < high < critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Self; 5] = [
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Info,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(CoreError::Validation(format!(
                "unknown severity '{other}' (expected info, low, medium, high, critical)"
            ))),
        }
    }
}
