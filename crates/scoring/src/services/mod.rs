pub mod aggregator;
pub mod leaderboard;
pub mod ranking;
pub mod streak;
