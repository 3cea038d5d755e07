use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{CheckInRecord, ScoringRules};
use crate::day;
use crate::error::{Result, ScoringError};

/// A nutritionist-owned, time-boxed competition.
///
/// The window is an inclusive range of UTC calendar days. `version` changes
/// whenever the scoring rules change; the participant set may change within a
/// version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CompetitionDefinition {
    pub competition_id: Uuid,
    pub owner_id: Uuid,
    #[serde(default = "default_version")]
    pub version: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub participant_ids: BTreeSet<Uuid>,
    #[validate(nested)]
    pub scoring_rules: ScoringRules,
}

fn default_version() -> u32 {
    1
}

impl CompetitionDefinition {
    /// Window and rule checks that must pass before anything is scored.
    pub fn validate_definition(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(ScoringError::InvalidWindow {
                start: self.start_date,
                end: self.end_date,
            });
        }
        self.validate()?;
        Ok(())
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        day::within_window(day, self.start_date, self.end_date)
    }

    pub fn includes(&self, check_in: &CheckInRecord) -> bool {
        self.contains_day(check_in.day())
    }

    pub fn has_participant(&self, participant_id: Uuid) -> bool {
        self.participant_ids.contains(&participant_id)
    }
}
