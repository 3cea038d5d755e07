//! Ordering and rank assignment.
//!
//! Order: `total_score` desc, then `check_in_count` desc, then
//! `last_check_in_at` asc (participants without check-ins last), then
//! `participant_id` asc. Ranks follow standard competition ranking: entries
//! with the same `(total_score, check_in_count, last_check_in_at)` share a
//! rank and the next group starts at its 1-based position (1, 1, 3, 4).

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::{LeaderboardEntry, ParticipantScore};

pub fn compare_scores(a: &ParticipantScore, b: &ParticipantScore) -> Ordering {
    b.total_score
        .cmp(&a.total_score)
        .then_with(|| b.check_in_count.cmp(&a.check_in_count))
        .then_with(|| compare_last_check_in(a.last_check_in_at, b.last_check_in_at))
        .then_with(|| a.participant_id.cmp(&b.participant_id))
}

fn compare_last_check_in(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn rank_scores(mut scores: Vec<ParticipantScore>) -> Vec<LeaderboardEntry> {
    scores.sort_by(compare_scores);

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(scores.len());
    for (index, score) in scores.into_iter().enumerate() {
        let position = index as u32 + 1;
        let rank = match entries.last() {
            Some(previous) if previous.score.tie_key() == score.tie_key() => previous.rank,
            _ => position,
        };
        entries.push(LeaderboardEntry { rank, score });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn score(id: u128, total: u64, count: u32, last: Option<i64>) -> ParticipantScore {
        ParticipantScore {
            participant_id: Uuid::from_u128(id),
            competition_id: Uuid::nil(),
            check_in_count: count,
            base_points: total,
            consistency_points: 0,
            rating_points: 0,
            total_score: total,
            longest_streak_days: 0,
            last_check_in_at: last.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
        }
    }

    fn ranks(entries: &[LeaderboardEntry]) -> Vec<u32> {
        entries.iter().map(|e| e.rank).collect()
    }

    fn ids(entries: &[LeaderboardEntry]) -> Vec<u128> {
        entries.iter().map(|e| e.score.participant_id.as_u128()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_scores(Vec::new()).is_empty());
    }

    #[test]
    fn test_competition_ranking_gaps() {
        let entries = rank_scores(vec![
            score(1, 50, 5, Some(100)),
            score(2, 50, 5, Some(100)),
            score(3, 40, 4, Some(100)),
            score(4, 30, 3, Some(100)),
        ]);

        assert_eq!(ranks(&entries), vec![1, 1, 3, 4]);
        assert_eq!(ids(&entries), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_check_in_count_breaks_score_ties() {
        let entries = rank_scores(vec![score(1, 50, 4, Some(100)), score(2, 50, 5, Some(100))]);

        assert_eq!(ids(&entries), vec![2, 1]);
        assert_eq!(ranks(&entries), vec![1, 2]);
    }

    #[test]
    fn test_earlier_last_check_in_ranks_higher() {
        let entries = rank_scores(vec![score(1, 50, 5, Some(200)), score(2, 50, 5, Some(100))]);

        assert_eq!(ids(&entries), vec![2, 1]);
        assert_eq!(ranks(&entries), vec![1, 2]);
    }

    #[test]
    fn test_participant_id_orders_full_ties_without_splitting_rank() {
        let entries = rank_scores(vec![score(9, 10, 1, Some(5)), score(3, 10, 1, Some(5))]);

        assert_eq!(ids(&entries), vec![3, 9]);
        assert_eq!(ranks(&entries), vec![1, 1]);
    }

    #[test]
    fn test_zero_check_ins_rank_last_among_equals() {
        let entries = rank_scores(vec![
            score(1, 0, 0, None),
            score(2, 0, 1, Some(100)),
            score(3, 0, 0, None),
        ]);

        assert_eq!(ids(&entries), vec![2, 1, 3]);
        assert_eq!(ranks(&entries), vec![1, 2, 2]);
    }

    fn arb_score() -> impl Strategy<Value = ParticipantScore> {
        (any::<u128>(), 0u64..20, 0u32..4, proptest::option::of(0i64..3)).prop_map(
            |(id, total, count, last)| score(id, total, count, last),
        )
    }

    proptest! {
        #[test]
        fn prop_ranking_is_monotonic_and_grouped(
            scores in proptest::collection::vec(arb_score(), 0..40)
        ) {
            let entries = rank_scores(scores.clone());
            prop_assert_eq!(entries.len(), scores.len());

            for (index, pair) in entries.windows(2).enumerate() {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert_ne!(compare_scores(&a.score, &b.score), Ordering::Greater);
                prop_assert!(a.score.total_score >= b.score.total_score);

                if a.score.tie_key() == b.score.tie_key() {
                    prop_assert_eq!(a.rank, b.rank);
                } else {
                    prop_assert_eq!(b.rank as usize, index + 2);
                }
            }

            if let Some(first) = entries.first() {
                prop_assert_eq!(first.rank, 1);
            }
        }

        #[test]
        fn prop_ranking_ignores_input_order(
            scores in proptest::collection::vec(arb_score(), 0..40)
        ) {
            let mut reversed = scores.clone();
            reversed.reverse();

            prop_assert_eq!(rank_scores(scores), rank_scores(reversed));
        }
    }
}
