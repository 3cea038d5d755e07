use scoring::{CheckInRecord, CompetitionDefinition};
use thiserror::Error;
use uuid::Uuid;

/// Identity of the caller on whose behalf check-ins are read.
///
/// Always passed explicitly; nothing in this crate remembers who is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: Uuid,
}

impl Session {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("User {user_id} may not read check-ins of competition {competition_id}")]
    Unauthorized { user_id: Uuid, competition_id: Uuid },

    #[error("Check-in fetch failed: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Failures that affect every participant, so there is no point in
    /// degrading to a partial leaderboard.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SourceError::Unauthorized { .. })
    }
}

/// Where check-ins come from.
///
/// Implementations return every record that could fall in the competition
/// window (over-fetching at the edges is fine; the engine filters exactly)
/// and must report failure as an error, never as an empty list.
#[async_trait::async_trait]
pub trait CheckInSource: Send + Sync {
    async fn fetch_check_ins(
        &self,
        session: &Session,
        competition: &CompetitionDefinition,
        participant_id: Uuid,
    ) -> Result<Vec<CheckInRecord>, SourceError>;

    fn name(&self) -> &'static str;
}
