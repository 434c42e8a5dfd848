//! Coarse classification of provider error messages.
//!
//! Unipile and the N8N sender report failures as free text. Every decision the
//! tooling makes about a failed send (retry later, mark as already invited,
//! pause the account) keys on the category returned here.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::enums::ProspectStatus;

/// Days LinkedIn asks senders to wait before re-inviting the same recipient.
const INVITATION_COOLDOWN_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    WeeklyLimit,
    DailyLimit,
    InvitationCooldown,
    AlreadyInvited,
    AlreadyConnected,
    AccountDisconnected,
    ProfileNotFound,
    Network,
    Unknown,
}

/// Ordered rules; the first match wins. Weekly precedes daily because weekly
/// limit messages also mention rate limiting.
const RULES: &[(ErrorCategory, &[&str])] = &[
    (ErrorCategory::WeeklyLimit, &["weekly limit", "weekly invitation limit"]),
    (
        ErrorCategory::InvitationCooldown,
        &["should delay new invitation", "delay new invitation", "cannot_resend_yet"],
    ),
    (
        ErrorCategory::DailyLimit,
        &[
            "rate limit",
            "rate_limit",
            "daily limit",
            "too many requests",
            "429",
            "limit reached",
            "limit exceeded",
        ],
    ),
    (
        ErrorCategory::AlreadyInvited,
        &[
            "already invited",
            "already_invited",
            "pending invitation",
            "invitation already",
        ],
    ),
    (
        ErrorCategory::AlreadyConnected,
        &["already connected", "first_degree", "already a connection"],
    ),
    (
        ErrorCategory::AccountDisconnected,
        &[
            "disconnected",
            "invalid credentials",
            "checkpoint",
            "reconnect",
        ],
    ),
    (
        ErrorCategory::ProfileNotFound,
        &[
            "not found",
            "404",
            "no such profile",
            "invalid recipient",
            "invalid_recipient",
        ],
    ),
    (
        ErrorCategory::Network,
        &[
            "timeout",
            "timed out",
            "econnreset",
            "econnrefused",
            "socket hang up",
            "network",
            "fetch failed",
        ],
    ),
];

/// Classify an error message by case-insensitive substring matching.
#[must_use]
pub fn classify(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();
    if lower.contains("week") && lower.contains("limit") {
        return ErrorCategory::WeeklyLimit;
    }
    RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lower.contains(needle)))
        .map_or(ErrorCategory::Unknown, |(category, _)| *category)
}

/// Count messages per category.
pub fn tally<'a, I>(messages: I) -> BTreeMap<ErrorCategory, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for message in messages {
        *counts.entry(classify(message)).or_insert(0) += 1;
    }
    counts
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeeklyLimit => "weekly_limit",
            Self::DailyLimit => "daily_limit",
            Self::InvitationCooldown => "invitation_cooldown",
            Self::AlreadyInvited => "already_invited",
            Self::AlreadyConnected => "already_connected",
            Self::AccountDisconnected => "account_disconnected",
            Self::ProfileNotFound => "profile_not_found",
            Self::Network => "network",
            Self::Unknown => "unknown",
        }
    }

    /// Sending again later can succeed without anyone changing data.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::DailyLimit | Self::WeeklyLimit | Self::InvitationCooldown | Self::Network
        )
    }

    /// Affects the whole sending account rather than one recipient.
    #[must_use]
    pub const fn is_account_wide(self) -> bool {
        matches!(
            self,
            Self::DailyLimit | Self::WeeklyLimit | Self::AccountDisconnected
        )
    }

    /// Earliest time a retry makes sense, for time-bound categories.
    ///
    /// Daily limits reset at the next UTC midnight, weekly limits on the next
    /// Monday (a Sunday failure resumes the following day).
    #[must_use]
    pub fn resume_after(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let midnight = |days: i64| {
            (now.date_naive() + Duration::days(days))
                .and_time(NaiveTime::MIN)
                .and_utc()
        };
        match self {
            Self::DailyLimit => Some(midnight(1)),
            Self::WeeklyLimit => {
                let from_sunday = i64::from(now.weekday().num_days_from_sunday());
                let days = if from_sunday == 0 { 1 } else { 8 - from_sunday };
                Some(midnight(days))
            }
            Self::InvitationCooldown => Some(now + Duration::days(INVITATION_COOLDOWN_DAYS)),
            _ => None,
        }
    }

    /// Prospect status a failed send in this category should leave behind.
    #[must_use]
    pub fn suggested_prospect_status(self) -> ProspectStatus {
        match self {
            Self::DailyLimit => ProspectStatus::DailyLimitExceeded,
            Self::WeeklyLimit => ProspectStatus::WeeklyLimitExceeded,
            Self::AlreadyInvited | Self::InvitationCooldown => ProspectStatus::AlreadyInvited,
            Self::AlreadyConnected => ProspectStatus::Connected,
            Self::AccountDisconnected | Self::ProfileNotFound | Self::Network | Self::Unknown => {
                ProspectStatus::Failed
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};
    use rstest::rstest;

    #[rstest]
    #[case("You have reached the weekly limit of invitations", ErrorCategory::WeeklyLimit)]
    #[case("Rate limit hit: weekly invitation limit", ErrorCategory::WeeklyLimit)]
    #[case("Limit exceeded for this week", ErrorCategory::WeeklyLimit)]
    #[case("Should delay new invitation to this recipient", ErrorCategory::InvitationCooldown)]
    #[case("errors/cannot_resend_yet", ErrorCategory::InvitationCooldown)]
    #[case("Rate limit exceeded", ErrorCategory::DailyLimit)]
    #[case("HTTP 429 Too Many Requests", ErrorCategory::DailyLimit)]
    #[case("Daily limit reached - will retry tomorrow", ErrorCategory::DailyLimit)]
    #[case("User already invited", ErrorCategory::AlreadyInvited)]
    #[case("There is already a pending invitation", ErrorCategory::AlreadyInvited)]
    #[case("Recipient is FIRST_DEGREE", ErrorCategory::AlreadyConnected)]
    #[case("Account disconnected, please reconnect", ErrorCategory::AccountDisconnected)]
    #[case("LinkedIn checkpoint required", ErrorCategory::AccountDisconnected)]
    #[case("Profile not found", ErrorCategory::ProfileNotFound)]
    #[case("errors/invalid_recipient", ErrorCategory::ProfileNotFound)]
    #[case("request timed out after 30s", ErrorCategory::Network)]
    #[case("TypeError: fetch failed", ErrorCategory::Network)]
    #[case("something odd happened", ErrorCategory::Unknown)]
    #[case("", ErrorCategory::Unknown)]
    fn classifies_messages(#[case] message: &str, #[case] expected: ErrorCategory) {
        assert_eq!(classify(message), expected);
    }

    #[test]
    fn tally_groups_by_category() {
        let counts = tally(["rate limit", "429", "not found", "???"]);
        assert_eq!(counts[&ErrorCategory::DailyLimit], 2);
        assert_eq!(counts[&ErrorCategory::ProfileNotFound], 1);
        assert_eq!(counts[&ErrorCategory::Unknown], 1);
    }

    #[test]
    fn daily_limit_resumes_next_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 10, 15, 17, 45, 0).unwrap();
        let resume = ErrorCategory::DailyLimit.resume_after(now).unwrap();
        assert_eq!(resume, Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap());
    }

    #[rstest]
    #[case(2025, 10, 12, 13)] // Sunday -> Monday
    #[case(2025, 10, 13, 20)] // Monday -> next Monday
    #[case(2025, 10, 15, 20)] // Wednesday
    #[case(2025, 10, 18, 20)] // Saturday
    fn weekly_limit_resumes_next_monday(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] expected_day: u32,
    ) {
        let now = Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap();
        let resume = ErrorCategory::WeeklyLimit.resume_after(now).unwrap();
        assert_eq!(resume.weekday(), Weekday::Mon);
        assert_eq!(resume.day(), expected_day);
    }

    #[test]
    fn non_temporal_categories_have_no_resume_time() {
        let now = Utc::now();
        assert!(ErrorCategory::ProfileNotFound.resume_after(now).is_none());
        assert!(ErrorCategory::Unknown.resume_after(now).is_none());
    }

    #[test]
    fn suggested_statuses() {
        assert_eq!(
            ErrorCategory::WeeklyLimit.suggested_prospect_status(),
            ProspectStatus::WeeklyLimitExceeded
        );
        assert_eq!(
            ErrorCategory::Unknown.suggested_prospect_status(),
            ProspectStatus::Failed
        );
        assert!(ErrorCategory::Network.is_retryable());
        assert!(!ErrorCategory::ProfileNotFound.is_retryable());
    }
}
