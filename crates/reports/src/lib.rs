pub mod collect;
pub mod config;
pub mod error;
pub mod export;
pub mod render;
pub mod source;
pub mod validator;

pub use collect::collect_check_ins;
pub use config::Config;
pub use error::{ReportError, Result};
pub use export::{CompetitionExport, ExportSource};
pub use source::{CheckInSource, Session, SourceError};
