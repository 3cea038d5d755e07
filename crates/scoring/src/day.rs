//! Calendar-day convention shared by window filtering and streak detection.
//!
//! A check-in belongs to the UTC calendar day of its `occurred_at` instant.
//! Nothing else in the crate derives a day from a timestamp.

use chrono::{DateTime, NaiveDate, Utc};

pub fn check_in_day(occurred_at: DateTime<Utc>) -> NaiveDate {
    occurred_at.date_naive()
}

/// Inclusive on both ends.
pub fn within_window(day: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= day && day <= end
}

pub fn is_next_day(previous: NaiveDate, next: NaiveDate) -> bool {
    previous.succ_opt() == Some(next)
}
