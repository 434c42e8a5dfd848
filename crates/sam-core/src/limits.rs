//! Per-account daily send budgets.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::{WorkspaceAccount, timestamp};

/// Connection requests per account per day when the row has no limit.
pub const DEFAULT_DAILY_LIMIT: u32 = 20;

/// Snapshot of an account's sending budget for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyBudget {
    pub limit: u32,
    pub sent_today: u32,
    pub remaining: u32,
}

impl DailyBudget {
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Budget for `today`, treating the sent counter as reset when the last
/// counted send happened on another day.
#[must_use]
pub fn daily_budget(account: &WorkspaceAccount, today: NaiveDate, default_limit: u32) -> DailyBudget {
    let limit = account
        .daily_message_limit
        .filter(|limit| *limit > 0)
        .unwrap_or(default_limit);

    let counted_today = account
        .last_message_date
        .as_deref()
        .and_then(timestamp::parse)
        .is_some_and(|last| last.date_naive() == today);
    let sent_today = if counted_today {
        account.messages_sent_today.unwrap_or(0)
    } else {
        0
    };

    DailyBudget {
        limit,
        sent_today,
        remaining: limit.saturating_sub(sent_today),
    }
}

/// Sends left for `today` with the default limit.
#[must_use]
pub fn remaining_today(account: &WorkspaceAccount, today: NaiveDate) -> u32 {
    daily_budget(account, today, DEFAULT_DAILY_LIMIT).remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn account(limit: Option<u32>, sent: Option<u32>, last: Option<&str>) -> WorkspaceAccount {
        WorkspaceAccount {
            id: "wa-1".into(),
            workspace_id: "ws-1".into(),
            user_id: None,
            account_type: Some("linkedin".into()),
            unipile_account_id: Some("uni-1".into()),
            account_name: None,
            connection_status: None,
            is_active: Some(true),
            daily_message_limit: limit,
            messages_sent_today: sent,
            last_message_date: last.map(String::from),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()
    }

    #[test]
    fn defaults_to_twenty() {
        assert_eq!(remaining_today(&account(None, None, None), today()), 20);
        assert_eq!(remaining_today(&account(Some(0), None, None), today()), 20);
    }

    #[test]
    fn counts_sends_from_today() {
        let acct = account(Some(25), Some(7), Some("2025-10-15"));
        assert_eq!(
            daily_budget(&acct, today(), DEFAULT_DAILY_LIMIT),
            DailyBudget {
                limit: 25,
                sent_today: 7,
                remaining: 18
            }
        );
    }

    #[test]
    fn resets_on_new_day() {
        let acct = account(None, Some(20), Some("2025-10-14T23:59:00Z"));
        assert_eq!(remaining_today(&acct, today()), 20);
    }

    #[test]
    fn never_goes_negative() {
        let acct = account(Some(10), Some(15), Some("2025-10-15T08:00:00+00:00"));
        let budget = daily_budget(&acct, today(), DEFAULT_DAILY_LIMIT);
        assert_eq!(budget.remaining, 0);
        assert!(budget.is_exhausted());
    }
}
