//! Consecutive-day streak detection and the consistency bonus.
//!
//! Check-ins are collapsed to distinct UTC days and scanned for maximal runs
//! of consecutive days. A run of `L` days earns
//! `floor(L / consistency_threshold_days) * consistency_bonus`, so a 14-day
//! run with a 7-day threshold earns the bonus twice while an 8-day run earns
//! it once. Only days inside the competition window are ever passed in, so a
//! run that began before the window counts from the window start.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::day;
use crate::models::ScoringRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakRun {
    pub start: NaiveDate,
    pub length: u32,
}

impl StreakRun {
    pub fn end(&self) -> NaiveDate {
        self.start + chrono::Days::new(u64::from(self.length.saturating_sub(1)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakSummary {
    pub runs: Vec<StreakRun>,
    pub consistency_points: u64,
    pub longest_streak_days: u32,
}

/// Maximal runs of consecutive days, in ascending order.
pub fn streak_runs(days: &BTreeSet<NaiveDate>) -> Vec<StreakRun> {
    let mut runs: Vec<StreakRun> = Vec::new();

    for &day in days {
        match runs.last_mut() {
            Some(run) if day::is_next_day(run.end(), day) => run.length += 1,
            _ => runs.push(StreakRun {
                start: day,
                length: 1,
            }),
        }
    }

    runs
}

#[derive(Debug, Clone, Copy)]
pub struct StreakCalculator {
    threshold_days: u32,
    bonus: u32,
}

impl StreakCalculator {
    pub fn new(rules: &ScoringRules) -> Self {
        Self {
            threshold_days: rules.consistency_threshold_days,
            bonus: rules.consistency_bonus,
        }
    }

    pub fn run_points(&self, run: &StreakRun) -> u64 {
        let completed = run.length.checked_div(self.threshold_days).unwrap_or(0);
        u64::from(completed) * u64::from(self.bonus)
    }

    pub fn summarize(&self, days: &BTreeSet<NaiveDate>) -> StreakSummary {
        let runs = streak_runs(days);
        let consistency_points = runs.iter().map(|run| self.run_points(run)).sum();
        let longest_streak_days = runs.iter().map(|run| run.length).max().unwrap_or(0);

        StreakSummary {
            runs,
            consistency_points,
            longest_streak_days,
        }
    }
}
