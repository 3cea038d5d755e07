//! Competition export documents and a check-in source backed by one.
//!
//! An export carries the competition definition and check-in rows as the
//! backend stores them. Rows are mapped to [`CheckInRecord`] here and nowhere
//! else.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use scoring::{CheckInRecord, CompetitionDefinition};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::Result;
use crate::source::{CheckInSource, Session, SourceError};

pub const FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionExport {
    pub format_version: String,
    pub exported_at: DateTime<Utc>,
    pub competition: CompetitionDefinition,
    pub check_ins: Vec<CheckInRow>,
    /// Participants whose check-ins the exporting job could not read.
    #[serde(default)]
    pub failed_participants: Vec<FailedFetch>,
}

/// A check-in row as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hunger_rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction_rating: Option<i64>,
    /// Not used for scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satiety_rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFetch {
    pub participant_id: Uuid,
    pub reason: String,
}

impl CheckInRow {
    /// Maps the row to a scoring record.
    ///
    /// A missing or non-representable rating becomes 0, which the engine
    /// rejects and reports instead of silently scoring.
    pub fn to_record(&self) -> CheckInRecord {
        CheckInRecord {
            check_in_id: self.id,
            participant_id: self.user_id,
            occurred_at: self.created_at,
            hunger_rating: rating(self.hunger_rating),
            satisfaction_rating: rating(self.satisfaction_rating),
        }
    }
}

fn rating(value: Option<i64>) -> u8 {
    value.and_then(|v| u8::try_from(v).ok()).unwrap_or(0)
}

impl CompetitionExport {
    pub async fn load(path: &Path) -> Result<Self> {
        let json_content = tokio::fs::read_to_string(path).await?;
        let export: CompetitionExport = serde_json::from_str(&json_content)?;
        Ok(export)
    }
}

/// Serves check-ins out of a [`CompetitionExport`].
///
/// Only the competition owner may read them. Participants listed as failed
/// in the export fail here too.
pub struct ExportSource {
    competition_id: Uuid,
    owner_id: Uuid,
    check_ins: HashMap<Uuid, Vec<CheckInRecord>>,
    failed: HashMap<Uuid, String>,
}

impl ExportSource {
    pub fn new(export: &CompetitionExport) -> Self {
        let mut check_ins: HashMap<Uuid, Vec<CheckInRecord>> = HashMap::new();
        for row in &export.check_ins {
            check_ins.entry(row.user_id).or_default().push(row.to_record());
        }
        for records in check_ins.values_mut() {
            records.sort_by_key(|record| (record.occurred_at, record.check_in_id));
        }

        let failed = export
            .failed_participants
            .iter()
            .map(|f| (f.participant_id, f.reason.clone()))
            .collect();

        Self {
            competition_id: export.competition.competition_id,
            owner_id: export.competition.owner_id,
            check_ins,
            failed,
        }
    }
}

#[async_trait::async_trait]
impl CheckInSource for ExportSource {
    async fn fetch_check_ins(
        &self,
        session: &Session,
        competition: &CompetitionDefinition,
        participant_id: Uuid,
    ) -> std::result::Result<Vec<CheckInRecord>, SourceError> {
        if session.user_id() != self.owner_id {
            return Err(SourceError::Unauthorized {
                user_id: session.user_id(),
                competition_id: competition.competition_id,
            });
        }
        if competition.competition_id != self.competition_id {
            return Err(SourceError::Unavailable(format!(
                "export does not contain competition {}",
                competition.competition_id
            )));
        }
        if let Some(reason) = self.failed.get(&participant_id) {
            return Err(SourceError::Unavailable(reason.clone()));
        }

        let records = self.check_ins.get(&participant_id).cloned().unwrap_or_default();
        debug!(
            "Loaded {} check-in(s) of participant {} from export",
            records.len(),
            participant_id
        );
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "export"
    }
}
