use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CheckInRecord, CompetitionDefinition, ExcludedCheckIn};

/// Base and rating points of one participant, plus the in-window days the
/// streak calculation needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub check_in_count: u32,
    pub base_points: u64,
    pub rating_points: u64,
    pub last_check_in_at: Option<DateTime<Utc>>,
    pub check_in_days: BTreeSet<NaiveDate>,
}

/// In-scope check-ins split by whether their ratings are usable.
#[derive(Debug, Default)]
pub struct Screened<'r> {
    pub accepted: Vec<&'r CheckInRecord>,
    pub excluded: Vec<ExcludedCheckIn>,
}

pub struct ScoreAggregator<'a> {
    definition: &'a CompetitionDefinition,
}

impl<'a> ScoreAggregator<'a> {
    pub fn new(definition: &'a CompetitionDefinition) -> Self {
        Self { definition }
    }

    /// A record counts only for its own participant and only when its UTC day
    /// falls inside the competition window.
    pub fn in_scope(&self, participant_id: Uuid, check_in: &CheckInRecord) -> bool {
        check_in.participant_id == participant_id && self.definition.includes(check_in)
    }

    /// Folds the in-scope records into point totals.
    ///
    /// Records outside the scope are skipped, and a repeated `check_in_id`
    /// counts once. Any in-scope record with a rating outside 1..=5 fails the
    /// whole aggregation.
    pub fn aggregate<'r, I>(&self, participant_id: Uuid, check_ins: I) -> Result<Aggregation>
    where
        I: IntoIterator<Item = &'r CheckInRecord>,
    {
        let rules = &self.definition.scoring_rules;
        let mut aggregation = Aggregation::default();
        let mut qualifying: u64 = 0;
        let mut seen = BTreeSet::new();

        for check_in in check_ins {
            if !self.in_scope(participant_id, check_in) || !seen.insert(check_in.check_in_id) {
                continue;
            }
            check_in.check_ratings()?;

            aggregation.check_in_count += 1;
            if check_in.meets_rating_threshold(rules.rating_bonus_threshold) {
                qualifying += 1;
            }
            aggregation.check_in_days.insert(check_in.day());
            aggregation.last_check_in_at =
                aggregation.last_check_in_at.max(Some(check_in.occurred_at));
        }

        aggregation.base_points =
            u64::from(aggregation.check_in_count) * u64::from(rules.check_in_points);
        aggregation.rating_points = qualifying * u64::from(rules.rating_bonus);

        Ok(aggregation)
    }

    /// Keeps in-scope records with valid ratings and reports the rest.
    ///
    /// Only the first occurrence of each `check_in_id` is considered.
    pub fn screen<'r>(
        &self,
        participant_id: Uuid,
        check_ins: &'r [CheckInRecord],
    ) -> Screened<'r> {
        let mut screened = Screened::default();
        let mut seen = BTreeSet::new();

        for check_in in check_ins.iter().filter(|c| self.in_scope(participant_id, c)) {
            if !seen.insert(check_in.check_in_id) {
                continue;
            }
            match check_in.invalid_rating() {
                None => screened.accepted.push(check_in),
                Some((field, value)) => screened.excluded.push(ExcludedCheckIn {
                    participant_id,
                    check_in_id: check_in.check_in_id,
                    field,
                    value,
                }),
            }
        }

        screened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;
    use crate::models::{RatingField, ScoringRules};
    use chrono::TimeZone;

    fn definition() -> CompetitionDefinition {
        CompetitionDefinition {
            competition_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            version: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            participant_ids: BTreeSet::new(),
            scoring_rules: ScoringRules {
                check_in_points: 10,
                consistency_bonus: 5,
                consistency_threshold_days: 7,
                rating_bonus: 2,
                rating_bonus_threshold: 4,
            },
        }
    }

    fn check_in(
        participant_id: Uuid,
        at: DateTime<Utc>,
        hunger: u8,
        satisfaction: u8,
    ) -> CheckInRecord {
        CheckInRecord {
            check_in_id: Uuid::new_v4(),
            participant_id,
            occurred_at: at,
            hunger_rating: hunger,
            satisfaction_rating: satisfaction,
        }
    }

    #[test]
    fn test_empty_input() {
        let def = definition();
        let aggregation = ScoreAggregator::new(&def)
            .aggregate(Uuid::new_v4(), std::iter::empty())
            .unwrap();

        assert_eq!(aggregation.check_in_count, 0);
        assert_eq!(aggregation.base_points, 0);
        assert_eq!(aggregation.rating_points, 0);
        assert!(aggregation.last_check_in_at.is_none());
    }

    #[test]
    fn test_rating_bonus_requires_both_ratings() {
        let def = definition();
        let participant = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();

        let lopsided = [check_in(participant, at, 5, 3)];
        let aggregation = ScoreAggregator::new(&def).aggregate(participant, &lopsided).unwrap();
        assert_eq!(aggregation.rating_points, 0);
        assert_eq!(aggregation.base_points, 10);

        let balanced = [check_in(participant, at, 4, 4)];
        let aggregation = ScoreAggregator::new(&def).aggregate(participant, &balanced).unwrap();
        assert_eq!(aggregation.rating_points, 2);
    }

    #[test]
    fn test_window_filtering_uses_utc_days() {
        let def = definition();
        let participant = Uuid::new_v4();
        let records = [
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        ]
        .map(|at| check_in(participant, at, 3, 3));

        let aggregation = ScoreAggregator::new(&def).aggregate(participant, &records).unwrap();
        assert_eq!(aggregation.check_in_count, 2);
        assert_eq!(
            aggregation.last_check_in_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap())
        );
    }

    #[test]
    fn test_other_participants_ignored() {
        let def = definition();
        let participant = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let records = [check_in(participant, at, 4, 4), check_in(Uuid::new_v4(), at, 5, 5)];

        let aggregation = ScoreAggregator::new(&def).aggregate(participant, &records).unwrap();
        assert_eq!(aggregation.check_in_count, 1);
    }

    #[test]
    fn test_invalid_rating_fails_aggregation() {
        let def = definition();
        let participant = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let records = [check_in(participant, at, 4, 4), check_in(participant, at, 0, 4)];

        let err = ScoreAggregator::new(&def).aggregate(participant, &records).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidRating { value: 0, .. }));
    }

    #[test]
    fn test_invalid_rating_outside_window_is_ignored() {
        let def = definition();
        let participant = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let records = [check_in(participant, at, 9, 9)];

        assert!(ScoreAggregator::new(&def).aggregate(participant, &records).is_ok());
    }

    #[test]
    fn test_screen_reports_excluded_records() {
        let def = definition();
        let participant = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        let bad = check_in(participant, at, 3, 7);
        let records = vec![check_in(participant, at, 4, 4), bad.clone()];

        let screened = ScoreAggregator::new(&def).screen(participant, &records);
        assert_eq!(screened.accepted.len(), 1);
        assert_eq!(
            screened.excluded,
            vec![ExcludedCheckIn {
                participant_id: participant,
                check_in_id: bad.check_in_id,
                field: RatingField::Satisfaction,
                value: 7,
            }]
        );
    }

    #[test]
    fn test_repeated_check_in_counts_once() {
        let def = definition();
        let participant = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        let record = check_in(participant, at, 5, 5);
        let repeated = [record.clone(), record.clone(), record];

        let aggregator = ScoreAggregator::new(&def);
        let once = aggregator.aggregate(participant, &repeated[..1]).unwrap();
        let thrice = aggregator.aggregate(participant, &repeated).unwrap();
        assert_eq!(thrice, once);
        assert_eq!(thrice.check_in_count, 1);
        assert_eq!(thrice.rating_points, 2);

        let screened = aggregator.screen(participant, &repeated);
        assert_eq!(screened.accepted.len(), 1);
    }

    #[test]
    fn test_repeated_invalid_check_in_is_excluded_once() {
        let def = definition();
        let participant = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        let bad = check_in(participant, at, 6, 4);
        let records = vec![bad.clone(), bad];

        let screened = ScoreAggregator::new(&def).screen(participant, &records);
        assert!(screened.accepted.is_empty());
        assert_eq!(screened.excluded.len(), 1);
    }
}
