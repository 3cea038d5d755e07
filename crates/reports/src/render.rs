use std::fmt::{self, Write};

use scoring::LeaderboardSnapshot;

/// Plain-text leaderboard: rank, total and the per-rule breakdown exactly as
/// stored in the snapshot.
pub fn render_table(snapshot: &LeaderboardSnapshot) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    if write_table(&mut out, snapshot).is_err() {
        out.clear();
    }
    out
}

/// Writes the table produced by [`render_table`] into any formatter sink.
pub fn write_table(out: &mut impl Write, snapshot: &LeaderboardSnapshot) -> fmt::Result {
    writeln!(
        out,
        "Competition {} (rules v{}) - generated {}",
        snapshot.competition_id,
        snapshot.definition_version,
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(
        out,
        "{:>4}  {:<36}  {:>7}  {:>6}  {:>6}  {:>6}  {:>9}  {:>6}",
        "Rank", "Participant", "Total", "Base", "Streak", "Rating", "Check-ins", "Best"
    )?;

    for entry in &snapshot.entries {
        let score = &entry.score;
        writeln!(
            out,
            "{:>4}  {:<36}  {:>7}  {:>6}  {:>6}  {:>6}  {:>9}  {:>6}",
            entry.rank,
            score.participant_id,
            score.total_score,
            score.base_points,
            score.consistency_points,
            score.rating_points,
            score.check_in_count,
            score.longest_streak_days
        )?;
    }

    writeln!(out, "{} participant(s) ranked", snapshot.total_participants)?;

    if !snapshot.stale_participants.is_empty() {
        writeln!(out, "Unranked (data unavailable):")?;
        for stale in &snapshot.stale_participants {
            writeln!(out, "  {}  {}", stale.participant_id, stale.reason)?;
        }
    }

    if !snapshot.excluded_check_ins.is_empty() {
        writeln!(
            out,
            "{} check-in(s) excluded for invalid ratings",
            snapshot.excluded_check_ins.len()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use scoring::{
        ExcludedCheckIn, LeaderboardEntry, ParticipantScore, RatingField, StaleParticipant,
    };
    use uuid::Uuid;

    #[test]
    fn test_render_includes_breakdown_and_stale() {
        let participant = Uuid::from_u128(1);
        let mut score = ParticipantScore::zero(participant, Uuid::nil());
        score.check_in_count = 10;
        score.base_points = 100;
        score.consistency_points = 5;
        score.rating_points = 6;
        score.total_score = 111;

        let snapshot = LeaderboardSnapshot {
            competition_id: Uuid::nil(),
            definition_version: 1,
            generated_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            entries: vec![LeaderboardEntry { rank: 1, score }],
            total_participants: 1,
            excluded_check_ins: Vec::new(),
            stale_participants: vec![StaleParticipant {
                participant_id: Uuid::from_u128(2),
                reason: "timeout".to_string(),
            }],
        };

        let table = render_table(&snapshot);
        let id = participant.to_string();
        let row = table.lines().find(|line| line.contains(&id)).unwrap();
        let columns: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(columns, vec!["1", id.as_str(), "111", "100", "5", "6", "10", "0"]);
        assert!(table.contains("Unranked (data unavailable):"));
        assert!(table.contains("timeout"));
        assert!(!table.contains("excluded"));
    }

    #[test]
    fn test_write_table_reports_excluded_count() {
        let snapshot = LeaderboardSnapshot {
            competition_id: Uuid::nil(),
            definition_version: 3,
            generated_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            entries: Vec::new(),
            total_participants: 0,
            excluded_check_ins: vec![ExcludedCheckIn {
                participant_id: Uuid::from_u128(1),
                check_in_id: Uuid::from_u128(9),
                field: RatingField::Hunger,
                value: 0,
            }],
            stale_participants: Vec::new(),
        };

        let mut out = String::new();
        write_table(&mut out, &snapshot).unwrap();
        assert_eq!(out, render_table(&snapshot));
        assert!(out.contains("(rules v3)"));
        assert!(out.contains("0 participant(s) ranked"));
        assert!(out.contains("1 check-in(s) excluded for invalid ratings"));
    }
}
