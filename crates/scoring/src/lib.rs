//! Competition scoring and leaderboard engine.
//!
//! Turns per-participant meal check-ins into a ranked, immutable
//! [`LeaderboardSnapshot`]. Everything here is synchronous and free of I/O;
//! fetching check-ins and caching snapshots belong to the caller.

pub mod day;
pub mod error;
pub mod models;
pub mod services;

pub use error::{Result, ScoringError};
pub use models::{
    CheckInFetch, CheckInRecord, CompetitionDefinition, ExcludedCheckIn, LeaderboardEntry,
    LeaderboardSnapshot, ParticipantScore, RatingField, ScoringRules, StaleParticipant,
};
pub use services::leaderboard::{LeaderboardBuilder, MissingDataPolicy};
