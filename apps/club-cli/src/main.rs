//! # club
//!
//! Operator commands over a read-only snapshot of the club's data files.
//!
//! ```text
//! env (CLUB_*) ──► CliConfig ◄── flags
//!                      │
//!                      ▼
//!            Snapshot::load(data_dir)
//!                      │
//!                      ▼
//!         commands::* ──► stdout (text or --json)
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use club_cli::commands::{self, assign, email::EmailChoice, matching::SexArg};
use club_cli::{CliConfig, CliError, Snapshot};
use club_core::equipment::Selection;

#[derive(Parser)]
#[command(
    name = "club",
    about = "Licensee, pricing and equipment queries over the club data directory",
    version
)]
struct Cli {
    /// Snapshot directory (overrides CLUB_DATA_DIR)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Date used as "today", YYYY-MM-DD (overrides CLUB_AS_OF)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// tracing filter (overrides CLUB_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List licensee categories with their season descriptions
    Categories {
        /// Project descriptions on another season (ending year)
        #[arg(long)]
        season: Option<i32>,
    },

    /// Suggest a category from birth date and sex
    Match {
        /// Birth date, YYYY-MM-DD
        #[arg(long)]
        born: NaiveDate,

        #[arg(long, value_enum)]
        sex: SexArg,
    },

    /// Show a licensee's price breakdown and remaining due
    Price {
        licensee_id: String,
    },

    /// Show stock per item and size
    Stock {
        /// Only this equipment item
        #[arg(long)]
        item: Option<String>,
    },

    /// Preview an equipment assignment
    Assign {
        licensee_id: String,

        /// Size pick, repeatable: --size Maillot=M
        #[arg(long = "size", value_name = "ITEM=SIZE", value_parser = assign::parse_selection)]
        sizes: Vec<Selection>,

        /// Allow out-of-stock sizes (assignment becomes incomplete)
        #[arg(long)]
        force: bool,
    },

    /// Validate a registration form (or import rows) from a JSON file
    Validate {
        file: PathBuf,

        /// The file holds an array of import rows
        #[arg(long)]
        import: bool,
    },

    /// Preview an automatic email
    Email {
        licensee_id: String,

        #[arg(value_enum)]
        kind: EmailChoice,
    },
}

/// Initialize tracing, falling back to `info` on a bad directive.
fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = CliConfig::load()?.with_overrides(cli.data_dir, cli.as_of, cli.log);
    init_tracing(&config.log_filter);
    debug!(?config, "Configuration loaded");

    let today = config.today();
    let snapshot = Snapshot::load(&config.data_dir, today).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let json = cli.json;

    let ok = match cli.command {
        Commands::Categories { season } => {
            commands::categories::run(&snapshot, season, json, &mut out).map(|_| true)
        }
        Commands::Match { born, sex } => {
            commands::matching::run(&snapshot, born, sex.into(), today, json, &mut out)
                .map(|_| true)
        }
        Commands::Price { licensee_id } => {
            commands::price::run(&snapshot, &licensee_id, json, &mut out).map(|_| true)
        }
        Commands::Stock { item } => {
            commands::stock::run(&snapshot, item.as_deref(), json, &mut out).map(|_| true)
        }
        Commands::Assign {
            licensee_id,
            sizes,
            force,
        } => assign::run(&snapshot, &licensee_id, &sizes, force, json, &mut out).map(|_| true),
        Commands::Validate { file, import } => {
            let raw = tokio::fs::read_to_string(&file).await.map_err(CliError::from)?;
            info!(file = %file.display(), import, "Validating");
            if import {
                commands::validate::run_import(&snapshot, &raw, today, json, &mut out)
            } else {
                commands::validate::run_form(&snapshot, &raw, today, json, &mut out)
            }
        }
        Commands::Email { licensee_id, kind } => {
            commands::email::run(&snapshot, &licensee_id, kind, json, &mut out).map(|_| true)
        }
    }?;

    out.flush()?;

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
