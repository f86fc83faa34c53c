//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Command-line flags override individual values afterwards.

use std::env;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding the JSON snapshot files
    pub data_dir: PathBuf,

    /// tracing filter directive (`info`, `club_cli=debug`, ...)
    pub log_filter: String,

    /// Frozen "today" for age checks and default season
    pub as_of: Option<NaiveDate>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("CLUB_DATA_DIR").unwrap_or_else(|| "./data".to_string());
        if data_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue("CLUB_DATA_DIR".to_string()));
        }

        let log_filter = lookup("CLUB_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());

        let as_of = match lookup("CLUB_AS_OF") {
            Some(raw) if !raw.trim().is_empty() => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| ConfigError::InvalidValue("CLUB_AS_OF".to_string()))?,
            ),
            _ => None,
        };

        Ok(CliConfig {
            data_dir: PathBuf::from(data_dir),
            log_filter,
            as_of,
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        as_of: Option<NaiveDate>,
        log_filter: Option<String>,
    ) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(date) = as_of {
            self.as_of = Some(date);
        }
        if let Some(filter) = log_filter {
            self.log_filter = filter;
        }
        self
    }

    /// The date used as "today": the frozen date if set, else the UTC date.
    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
