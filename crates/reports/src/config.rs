use anyhow::{Context, Result};
use scoring::MissingDataPolicy;
use uuid::Uuid;

const DEFAULT_FETCH_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub session_user_id: Uuid,
    pub fetch_concurrency: usize,
    pub missing_data: MissingDataPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            session_user_id: std::env::var("SESSION_USER_ID")
                .context("Cannot load SESSION_USER_ID env variable")?
                .parse()
                .context("SESSION_USER_ID must be a UUID")?,
            fetch_concurrency: match std::env::var("FETCH_CONCURRENCY") {
                Ok(value) => value
                    .parse()
                    .context("FETCH_CONCURRENCY must be a number")?,
                Err(_) => DEFAULT_FETCH_CONCURRENCY,
            },
            missing_data: match std::env::var("MISSING_DATA_POLICY") {
                Ok(value) => value
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("Invalid MISSING_DATA_POLICY")?,
                Err(_) => MissingDataPolicy::default(),
            },
        })
    }
}
