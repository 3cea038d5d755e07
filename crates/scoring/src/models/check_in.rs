use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::day;
use crate::error::{Result, ScoringError};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// One logged meal check-in.
///
/// Records are values: an edited check-in reaches the engine as a new record,
/// never as a mutation of one already scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub check_in_id: Uuid,
    pub participant_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub hunger_rating: u8,
    pub satisfaction_rating: u8,
}

impl CheckInRecord {
    pub fn day(&self) -> NaiveDate {
        day::check_in_day(self.occurred_at)
    }

    /// First rating outside 1..=5, if any.
    pub fn invalid_rating(&self) -> Option<(RatingField, u8)> {
        [
            (RatingField::Hunger, self.hunger_rating),
            (RatingField::Satisfaction, self.satisfaction_rating),
        ]
        .into_iter()
        .find(|(_, value)| !(MIN_RATING..=MAX_RATING).contains(value))
    }

    pub fn check_ratings(&self) -> Result<()> {
        match self.invalid_rating() {
            Some((field, value)) => Err(ScoringError::InvalidRating {
                check_in_id: self.check_in_id,
                field,
                value,
            }),
            None => Ok(()),
        }
    }

    /// Both ratings must reach the threshold on their own.
    pub fn meets_rating_threshold(&self, threshold: u8) -> bool {
        self.hunger_rating >= threshold && self.satisfaction_rating >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingField {
    Hunger,
    Satisfaction,
}

impl RatingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hunger => "hunger",
            Self::Satisfaction => "satisfaction",
        }
    }
}

impl fmt::Display for RatingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of fetching one participant's check-ins.
///
/// A failed fetch stays distinguishable from a participant who simply has no
/// check-ins, so it can never be scored as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckInFetch {
    Complete { check_ins: Vec<CheckInRecord> },
    Failed { reason: String },
}

impl CheckInFetch {
    pub fn complete(check_ins: Vec<CheckInRecord>) -> Self {
        Self::Complete { check_ins }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
