use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const NANOS_PER_DAY: i64 = MILLIS_PER_DAY * 1_000_000;
const URGENT_WINDOW_DAYS: i64 = 3;

/// Whole days left until `deadline`, rounding partial days up.
///
/// Returns `None` when there is no deadline. Zero or negative values mean the deadline has
/// passed; a deadline thirty minutes out still counts as one day.
pub fn days_remaining(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    let remaining = deadline?.signed_duration_since(now);
    // num_nanoseconds overflows beyond roughly 292 years.
    let days = match remaining.num_nanoseconds() {
        Some(nanos) => ceil_div(nanos, NANOS_PER_DAY),
        None => ceil_div(remaining.num_milliseconds(), MILLIS_PER_DAY),
    };
    Some(days)
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator.div_euclid(denominator);
    if numerator.rem_euclid(denominator) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

/// Presentation bucket for a deadline's proximity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Expired,
    Urgent,
    Normal,
    None,
}

impl Urgency {
    pub const fn classify(days_remaining: Option<i64>) -> Self {
        match days_remaining {
            None => Self::None,
            Some(days) if days <= 0 => Self::Expired,
            Some(days) if days < URGENT_WINDOW_DAYS => Self::Urgent,
            Some(_) => Self::Normal,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Urgent => "urgent",
            Self::Normal => "normal",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineStatus {
    pub days_remaining: Option<i64>,
    pub urgency: Urgency,
}

pub fn deadline_status(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DeadlineStatus {
    let days_remaining = days_remaining(deadline, now);
    DeadlineStatus {
        days_remaining,
        urgency: Urgency::classify(days_remaining),
    }
}
