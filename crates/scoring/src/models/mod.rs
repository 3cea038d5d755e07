mod check_in;
mod competition;
mod leaderboard;
mod participant_score;
mod scoring_rules;

pub use check_in::{CheckInFetch, CheckInRecord, MAX_RATING, MIN_RATING, RatingField};
pub use competition::CompetitionDefinition;
pub use leaderboard::{ExcludedCheckIn, LeaderboardEntry, LeaderboardSnapshot, StaleParticipant};
pub use participant_score::ParticipantScore;
pub use scoring_rules::ScoringRules;
