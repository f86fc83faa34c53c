//! # club-cli
//!
//! Read-only operator commands over a club data directory.
//!
//! ## Configuration
//! Environment variables:
//! - `CLUB_DATA_DIR` - snapshot directory (default: `./data`)
//! - `CLUB_LOG` - tracing filter (default: `info`)
//! - `CLUB_AS_OF` - frozen "today", `YYYY-MM-DD` (default: current UTC date)

pub mod commands;
pub mod config;
pub mod error;
pub mod snapshot;

// Re-exports
pub use config::CliConfig;
pub use error::CliError;
pub use snapshot::Snapshot;
