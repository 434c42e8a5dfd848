//! Human-like send pacing for connection requests.
//!
//! Each sending account gets one of five daily activity patterns, chosen from
//! the calendar date and the account id so that the same account behaves
//! differently from day to day but identically when a plan is re-derived.
//! Delays between consecutive sends follow the pattern's hourly rate with
//! ±30% variation and are clamped to 2..=20 minutes.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_DELAY_MINUTES: u32 = 2;
pub const MAX_DELAY_MINUTES: u32 = 20;
const VARIATION: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPattern {
    /// 0-2 messages per hour.
    Slow,
    /// 2-3 messages per hour.
    Medium,
    /// 3-5 messages per hour.
    Busy,
    /// Alternates bursts (4-5/h) with lulls (1-2/h).
    Mixed,
    /// 1-4 messages per hour.
    Variable,
}

impl DayPattern {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Busy => "busy",
            Self::Mixed => "mixed",
            Self::Variable => "variable",
        }
    }

    /// Messages per hour for the send at `index`, with `unit` in `[0, 1)`.
    #[must_use]
    pub fn hourly_rate(self, index: usize, unit: f64) -> f64 {
        match self {
            Self::Slow => unit * 2.0,
            Self::Medium => 2.0 + unit,
            Self::Busy => unit.mul_add(2.0, 3.0),
            Self::Mixed if index % 2 == 0 => 4.0 + unit,
            Self::Mixed => 1.0 + unit,
            Self::Variable => unit.mul_add(3.0, 1.0),
        }
    }
}

impl fmt::Display for DayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(YYYYMMDD + first byte of the account id) mod 5`.
#[must_use]
pub fn day_pattern(date: NaiveDate, account_id: &str) -> DayPattern {
    let seed = date_seed(date) + u64::from(account_id.bytes().next().unwrap_or(0));
    match seed % 5 {
        0 => DayPattern::Slow,
        1 => DayPattern::Medium,
        2 => DayPattern::Busy,
        3 => DayPattern::Mixed,
        _ => DayPattern::Variable,
    }
}

/// Two stable pseudo-random values in `[0, 1)`: one for the hourly rate, one
/// for the ±30% variation.
#[must_use]
pub fn jitter(date: NaiveDate, account_id: &str, index: usize) -> (f64, f64) {
    let base = fnv1a(format!("{date}|{account_id}|{index}").as_bytes());
    (unit_from(base), unit_from(base.rotate_left(29) ^ 0x9E37_79B9_7F4A_7C15))
}

/// Minutes to wait before the send at `index` (the first send goes
/// immediately).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn send_delay_minutes(index: usize, pattern: DayPattern, jitter: (f64, f64)) -> u32 {
    if index == 0 {
        return 0;
    }
    let (rate_unit, variation_unit) = jitter;
    let rate = pattern.hourly_rate(index, rate_unit);
    if rate <= f64::EPSILON {
        return MAX_DELAY_MINUTES;
    }
    let average = 60.0 / rate;
    let varied = (average * (1.0 + (variation_unit - 0.5) * VARIATION)).round();
    varied.clamp(f64::from(MIN_DELAY_MINUTES), f64::from(MAX_DELAY_MINUTES)) as u32
}

/// Pacing for one account on one day.
#[derive(Debug, Clone)]
pub struct Pacer {
    date: NaiveDate,
    account_id: String,
    pattern: DayPattern,
}

impl Pacer {
    #[must_use]
    pub fn new(date: NaiveDate, account_id: impl Into<String>) -> Self {
        let account_id = account_id.into();
        let pattern = day_pattern(date, &account_id);
        Self {
            date,
            account_id,
            pattern,
        }
    }

    #[must_use]
    pub const fn pattern(&self) -> DayPattern {
        self.pattern
    }

    #[must_use]
    pub fn delay_minutes(&self, index: usize) -> u32 {
        send_delay_minutes(index, self.pattern, jitter(self.date, &self.account_id, index))
    }
}

fn date_seed(date: NaiveDate) -> u64 {
    let year = u64::try_from(date.year()).unwrap_or(0);
    year * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[allow(clippy::cast_precision_loss)]
fn unit_from(value: u64) -> f64 {
    // Top 53 bits give an exactly representable fraction.
    (value >> 11) as f64 / (1_u64 << 53) as f64
}
