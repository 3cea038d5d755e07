use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregated score of one participant in one competition.
///
/// `total_score` is always `base_points + consistency_points + rating_points`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantScore {
    pub participant_id: Uuid,
    pub competition_id: Uuid,
    pub check_in_count: u32,
    pub base_points: u64,
    pub consistency_points: u64,
    pub rating_points: u64,
    pub total_score: u64,
    /// Longest run of consecutive in-window days; informational, not ranked on.
    pub longest_streak_days: u32,
    pub last_check_in_at: Option<DateTime<Utc>>,
}

impl ParticipantScore {
    /// Score of a participant with no check-ins in the window.
    pub fn zero(participant_id: Uuid, competition_id: Uuid) -> Self {
        Self {
            participant_id,
            competition_id,
            check_in_count: 0,
            base_points: 0,
            consistency_points: 0,
            rating_points: 0,
            total_score: 0,
            longest_streak_days: 0,
            last_check_in_at: None,
        }
    }

    /// Fields that decide whether two participants share a rank.
    pub fn tie_key(&self) -> (u64, u32, Option<DateTime<Utc>>) {
        (self.total_score, self.check_in_count, self.last_check_in_at)
    }
}
