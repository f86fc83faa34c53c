//! Error types for the CLI.

use club_core::CoreError;

use crate::config::ConfigError;
use crate::snapshot::SnapshotError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Writing to stdout failed
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed command-line argument
    #[error("Invalid argument: {0}")]
    Usage(String),
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        CliError::Usage(msg.into())
    }
}
