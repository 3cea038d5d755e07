use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::aggregator::ScoreAggregator;
use super::ranking::rank_scores;
use super::streak::StreakCalculator;
use crate::error::{Result, ScoringError};
use crate::models::{
    CheckInFetch, CheckInRecord, CompetitionDefinition, ExcludedCheckIn, LeaderboardSnapshot,
    ParticipantScore, StaleParticipant,
};

const MISSING_FETCH_REASON: &str = "no check-in data supplied";

/// What to do when a participant's check-ins could not be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDataPolicy {
    /// Leave the participant unranked and list them as stale.
    #[default]
    #[serde(rename = "stale")]
    MarkStale,
    /// Refuse to produce a snapshot.
    Refuse,
}

impl FromStr for MissingDataPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stale" | "mark-stale" => Ok(Self::MarkStale),
            "refuse" | "strict" => Ok(Self::Refuse),
            other => Err(format!(
                "Unknown missing data policy '{}'. Expected 'stale' or 'refuse'",
                other
            )),
        }
    }
}

/// Working set a snapshot is assembled from.
#[derive(Debug, Default)]
struct Tally {
    scores: Vec<ParticipantScore>,
    excluded: Vec<ExcludedCheckIn>,
    stale: Vec<StaleParticipant>,
}

impl Tally {
    fn from_snapshot(snapshot: &LeaderboardSnapshot) -> Self {
        Self {
            scores: snapshot.scores().cloned().collect(),
            excluded: snapshot.excluded_check_ins.clone(),
            stale: snapshot.stale_participants.clone(),
        }
    }

    fn retain_participants(&mut self, keep: impl Fn(Uuid) -> bool) {
        self.scores.retain(|score| keep(score.participant_id));
        self.excluded.retain(|excluded| keep(excluded.participant_id));
        self.stale.retain(|stale| keep(stale.participant_id));
    }

    fn knows(&self, participant_id: Uuid) -> bool {
        self.scores.iter().any(|s| s.participant_id == participant_id)
            || self.stale.iter().any(|s| s.participant_id == participant_id)
    }

    /// Brings membership in line with `definition`: removed participants are
    /// dropped and new ones enter with a zero score. Returns how many were
    /// added and removed.
    fn align_participants(&mut self, definition: &CompetitionDefinition) -> (usize, usize) {
        let before = self.scores.len() + self.stale.len();
        self.retain_participants(|id| definition.has_participant(id));
        let removed = before - self.scores.len() - self.stale.len();

        let added: Vec<Uuid> = definition
            .participant_ids
            .iter()
            .copied()
            .filter(|id| !self.knows(*id))
            .collect();
        for &participant_id in &added {
            self.scores
                .push(ParticipantScore::zero(participant_id, definition.competition_id));
        }

        (added.len(), removed)
    }
}

/// Turns check-ins into leaderboard snapshots.
///
/// Holds no state between calls: every method is a function of its arguments,
/// including the `generated_at` stamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaderboardBuilder {
    missing_data: MissingDataPolicy,
}

impl LeaderboardBuilder {
    pub fn new(missing_data: MissingDataPolicy) -> Self {
        Self { missing_data }
    }

    pub fn missing_data(&self) -> MissingDataPolicy {
        self.missing_data
    }

    /// Scores every participant of `definition` from scratch.
    ///
    /// A participant with no entry in `check_ins` is treated like a failed
    /// fetch. Entries for participants outside the definition are ignored.
    pub fn build(
        &self,
        definition: &CompetitionDefinition,
        check_ins: &HashMap<Uuid, CheckInFetch>,
        generated_at: DateTime<Utc>,
    ) -> Result<LeaderboardSnapshot> {
        definition.validate_definition()?;

        let mut tally = Tally::default();
        for &participant_id in &definition.participant_ids {
            match check_ins.get(&participant_id) {
                Some(fetch) => score_fetch(definition, participant_id, fetch, &mut tally)?,
                None => tally.stale.push(StaleParticipant {
                    participant_id,
                    reason: MISSING_FETCH_REASON.to_string(),
                }),
            }
        }

        let ignored = check_ins
            .keys()
            .filter(|id| !definition.has_participant(**id))
            .count();
        if ignored > 0 {
            debug!(
                "Ignoring check-ins of {} non-participant(s) for competition {}",
                ignored, definition.competition_id
            );
        }

        self.finish(definition, tally, generated_at)
    }

    /// Recomputes one participant from their full check-in list and re-ranks.
    ///
    /// The result equals a full [`build`](Self::build) over the same final
    /// data. Only the changed participant is re-aggregated. Membership
    /// changes in `definition` are applied first, exactly as
    /// [`sync_participants`](Self::sync_participants) does.
    pub fn update(
        &self,
        prior: &LeaderboardSnapshot,
        definition: &CompetitionDefinition,
        participant_id: Uuid,
        fetch: &CheckInFetch,
        generated_at: DateTime<Utc>,
    ) -> Result<LeaderboardSnapshot> {
        definition.validate_definition()?;
        ensure_same_definition(prior, definition)?;

        if !definition.has_participant(participant_id) {
            return Err(ScoringError::UnknownParticipant {
                participant_id,
                competition_id: definition.competition_id,
            });
        }

        let mut tally = Tally::from_snapshot(prior);
        let (added, removed) = tally.align_participants(definition);
        if added > 0 || removed > 0 {
            debug!(
                "Applied membership changes to competition {}: {} added, {} removed",
                definition.competition_id, added, removed
            );
        }
        tally.retain_participants(|id| id != participant_id);
        score_fetch(definition, participant_id, fetch, &mut tally)?;

        self.finish(definition, tally, generated_at)
    }

    /// Applies participant-set changes of `definition` to a prior snapshot.
    ///
    /// New participants enter with a zero score until their check-ins are
    /// supplied through [`update`](Self::update). Removed participants are
    /// dropped entirely; nobody else's score changes.
    pub fn sync_participants(
        &self,
        prior: &LeaderboardSnapshot,
        definition: &CompetitionDefinition,
        generated_at: DateTime<Utc>,
    ) -> Result<LeaderboardSnapshot> {
        definition.validate_definition()?;
        ensure_same_definition(prior, definition)?;

        let mut tally = Tally::from_snapshot(prior);
        let (added, removed) = tally.align_participants(definition);

        debug!(
            "Synced participants of competition {}: {} added, {} removed",
            definition.competition_id, added, removed
        );

        self.finish(definition, tally, generated_at)
    }

    fn finish(
        &self,
        definition: &CompetitionDefinition,
        mut tally: Tally,
        generated_at: DateTime<Utc>,
    ) -> Result<LeaderboardSnapshot> {
        tally.stale.sort_by_key(|stale| stale.participant_id);

        if !tally.stale.is_empty() {
            match self.missing_data {
                MissingDataPolicy::Refuse => {
                    return Err(ScoringError::IncompleteData {
                        participant_ids: tally.stale.iter().map(|s| s.participant_id).collect(),
                    });
                }
                MissingDataPolicy::MarkStale => {
                    for stale in &tally.stale {
                        warn!(
                            "Participant {} left unranked in competition {}: {}",
                            stale.participant_id, definition.competition_id, stale.reason
                        );
                    }
                }
            }
        }

        tally
            .excluded
            .sort_by_key(|e| (e.participant_id, e.check_in_id, e.field));

        let entries = rank_scores(tally.scores);
        debug!(
            "Ranked {} participant(s) for competition {} ({} stale, {} excluded check-ins)",
            entries.len(),
            definition.competition_id,
            tally.stale.len(),
            tally.excluded.len()
        );

        Ok(LeaderboardSnapshot {
            competition_id: definition.competition_id,
            definition_version: definition.version,
            generated_at,
            total_participants: entries.len(),
            entries,
            excluded_check_ins: tally.excluded,
            stale_participants: tally.stale,
        })
    }
}

fn ensure_same_definition(
    prior: &LeaderboardSnapshot,
    definition: &CompetitionDefinition,
) -> Result<()> {
    if prior.competition_id != definition.competition_id
        || prior.definition_version != definition.version
    {
        return Err(ScoringError::DefinitionMismatch {
            snapshot_competition: prior.competition_id,
            snapshot_version: prior.definition_version,
            competition: definition.competition_id,
            version: definition.version,
        });
    }
    Ok(())
}

fn score_fetch(
    definition: &CompetitionDefinition,
    participant_id: Uuid,
    fetch: &CheckInFetch,
    tally: &mut Tally,
) -> Result<()> {
    match fetch {
        CheckInFetch::Complete { check_ins } => {
            let (score, excluded) = score_participant(definition, participant_id, check_ins)?;
            tally.scores.push(score);
            tally.excluded.extend(excluded);
        }
        CheckInFetch::Failed { reason } => tally.stale.push(StaleParticipant {
            participant_id,
            reason: reason.clone(),
        }),
    }
    Ok(())
}

/// Full score of one participant. Records with out-of-range ratings are left
/// out and returned alongside the score.
pub fn score_participant(
    definition: &CompetitionDefinition,
    participant_id: Uuid,
    check_ins: &[CheckInRecord],
) -> Result<(ParticipantScore, Vec<ExcludedCheckIn>)> {
    let aggregator = ScoreAggregator::new(definition);
    let screened = aggregator.screen(participant_id, check_ins);

    for excluded in &screened.excluded {
        warn!(
            "Excluding check-in {} of participant {}: {} rating {} out of range",
            excluded.check_in_id, participant_id, excluded.field, excluded.value
        );
    }

    let aggregation = aggregator.aggregate(participant_id, screened.accepted.iter().copied())?;
    let streak =
        StreakCalculator::new(&definition.scoring_rules).summarize(&aggregation.check_in_days);
    let total_score =
        aggregation.base_points + streak.consistency_points + aggregation.rating_points;

    let score = ParticipantScore {
        participant_id,
        competition_id: definition.competition_id,
        check_in_count: aggregation.check_in_count,
        base_points: aggregation.base_points,
        consistency_points: streak.consistency_points,
        rating_points: aggregation.rating_points,
        total_score,
        longest_streak_days: streak.longest_streak_days,
        last_check_in_at: aggregation.last_check_in_at,
    };

    Ok((score, screened.excluded))
}
