use std::collections::HashSet;

use tracing::warn;

use crate::export::{CompetitionExport, FORMAT_VERSION};
use crate::{ReportError, Result};

pub struct ExportValidator;

impl ExportValidator {
    pub fn validate(export: &CompetitionExport) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();
        let competition = &export.competition;

        if export.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                export.format_version, FORMAT_VERSION
            ));
        }

        if let Err(e) = competition.validate_definition() {
            report.errors.push(e.to_string());
        }

        if competition.participant_ids.is_empty() {
            report
                .warnings
                .push("Competition has no participants".to_string());
        }

        let mut check_in_ids = HashSet::new();
        for row in &export.check_ins {
            if !check_in_ids.insert(row.id) {
                report
                    .errors
                    .push(format!("Duplicate check-in id: '{}'", row.id));
            }

            if !competition.has_participant(row.user_id) {
                report.warnings.push(format!(
                    "Check-in {} belongs to non-participant {}",
                    row.id, row.user_id
                ));
                continue;
            }

            let record = row.to_record();
            if !competition.includes(&record) {
                report.warnings.push(format!(
                    "Check-in {} on {} is outside the competition window",
                    row.id,
                    record.day()
                ));
                continue;
            }

            if let Some((field, _)) = record.invalid_rating() {
                let raw = match field {
                    scoring::RatingField::Hunger => row.hunger_rating,
                    scoring::RatingField::Satisfaction => row.satisfaction_rating,
                };
                let shown = raw.map_or_else(|| "missing".to_string(), |v| v.to_string());
                report.warnings.push(format!(
                    "Check-in {} has invalid {} rating ({}) and will be excluded",
                    row.id, field, shown
                ));
            }
        }

        let mut failed_ids = HashSet::new();
        for failed in &export.failed_participants {
            if !failed_ids.insert(failed.participant_id) {
                report.errors.push(format!(
                    "Participant {} is listed as failed more than once",
                    failed.participant_id
                ));
            }
            if !competition.has_participant(failed.participant_id) {
                report.warnings.push(format!(
                    "Failed participant {} is not part of the competition",
                    failed.participant_id
                ));
            }
        }

        if !report.errors.is_empty() {
            Err(ReportError::Validation(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
