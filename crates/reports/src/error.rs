use thiserror::Error;

use crate::source::SourceError;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Scoring error: {0}")]
    Scoring(#[from] scoring::ScoringError),

    #[error("Check-in source error: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
