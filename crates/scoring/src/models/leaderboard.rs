use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ParticipantScore, RatingField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based competition rank; tied entries share a rank.
    pub rank: u32,
    #[serde(flatten)]
    pub score: ParticipantScore,
}

/// A check-in left out of scoring because one of its ratings was out of range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedCheckIn {
    pub participant_id: Uuid,
    pub check_in_id: Uuid,
    pub field: RatingField,
    pub value: u8,
}

/// A participant left unranked because their check-ins could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleParticipant {
    pub participant_id: Uuid,
    pub reason: String,
}

/// Immutable, fully ranked view of a competition at one point in time.
///
/// Entries are stored in ranking order. Every recomputation produces a new
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub competition_id: Uuid,
    pub definition_version: u32,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<LeaderboardEntry>,
    /// Number of ranked entries; stale participants are not counted.
    pub total_participants: usize,
    pub excluded_check_ins: Vec<ExcludedCheckIn>,
    pub stale_participants: Vec<StaleParticipant>,
}

impl LeaderboardSnapshot {
    pub fn entry(&self, participant_id: Uuid) -> Option<&LeaderboardEntry> {
        self.entries
            .iter()
            .find(|entry| entry.score.participant_id == participant_id)
    }

    pub fn is_stale(&self, participant_id: Uuid) -> bool {
        self.stale_participants
            .iter()
            .any(|stale| stale.participant_id == participant_id)
    }

    pub fn is_complete(&self) -> bool {
        self.stale_participants.is_empty()
    }

    pub fn scores(&self) -> impl Iterator<Item = &ParticipantScore> {
        self.entries.iter().map(|entry| &entry.score)
    }
}
