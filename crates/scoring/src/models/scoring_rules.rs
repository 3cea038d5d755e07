use serde::{Deserialize, Serialize};
use validator::Validate;

/// Point rules of one competition version.
///
/// All amounts are whole, non-negative points so every consumer derives the
/// same totals without a rounding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ScoringRules {
    pub check_in_points: u32,

    pub consistency_bonus: u32,

    #[serde(default = "default_consistency_threshold_days")]
    #[validate(range(min = 1, message = "consistency_threshold_days must be at least 1"))]
    pub consistency_threshold_days: u32,

    pub rating_bonus: u32,

    #[serde(default = "default_rating_bonus_threshold")]
    #[validate(range(
        min = 1,
        max = 5,
        message = "rating_bonus_threshold must be between 1 and 5"
    ))]
    pub rating_bonus_threshold: u8,
}

fn default_consistency_threshold_days() -> u32 {
    7
}

fn default_rating_bonus_threshold() -> u8 {
    4
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            check_in_points: 0,
            consistency_bonus: 0,
            consistency_threshold_days: default_consistency_threshold_days(),
            rating_bonus: 0,
            rating_bonus_threshold: default_rating_bonus_threshold(),
        }
    }
}
