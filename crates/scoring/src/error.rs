use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::models::RatingField;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid {field} rating {value} on check-in {check_in_id}: must be between 1 and 5")]
    InvalidRating {
        check_in_id: Uuid,
        field: RatingField,
        value: u8,
    },

    #[error("Invalid competition window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Check-in data unavailable for {} participant(s)", participant_ids.len())]
    IncompleteData { participant_ids: Vec<Uuid> },

    #[error("Invalid scoring rules: {0}")]
    InvalidRules(#[from] ValidationErrors),

    #[error(
        "Snapshot belongs to competition {snapshot_competition} v{snapshot_version}, \
         definition is {competition} v{version}"
    )]
    DefinitionMismatch {
        snapshot_competition: Uuid,
        snapshot_version: u32,
        competition: Uuid,
        version: u32,
    },

    #[error("Participant {participant_id} is not part of competition {competition_id}")]
    UnknownParticipant {
        participant_id: Uuid,
        competition_id: Uuid,
    },
}

pub type Result<T> = std::result::Result<T, ScoringError>;

impl ScoringError {
    /// Whether the failure is confined to one participant or record rather
    /// than the whole competition.
    pub fn is_participant_local(&self) -> bool {
        matches!(
            self,
            ScoringError::InvalidRating { .. } | ScoringError::IncompleteData { .. }
        )
    }
}
