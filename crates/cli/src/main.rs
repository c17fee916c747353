// shelfmatch CLI - review fuzzy matches between two product catalogs

mod decide;
mod exit_codes;
mod export;
mod logging;
mod report;
mod tui;
mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use shelfmatch_recon::error::ConfigError;
use shelfmatch_recon::{FileStore, ReconError, ReviewConfig, ReviewSession, StatusFilter};

use exit_codes::{review_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "shelfmatch")]
#[command(about = "Match a primary product catalog against a candidate catalog, one decision at a time")]
#[command(version)]
struct Cli {
    /// Project config file
    #[arg(
        long,
        short = 'c',
        global = true,
        env = "SHELFMATCH_CONFIG",
        default_value = "shelfmatch.toml"
    )]
    config: PathBuf,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the config and both catalogs, then report what was found
    Validate,

    /// Show decision counts
    #[command(after_help = "\
Examples:
  shelfmatch status
  shelfmatch status --json")]
    Status {
        /// Emit counts as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// List primary records with their shortlist or decision
    #[command(after_help = "\
Examples:
  shelfmatch list
  shelfmatch list --filter pending --max-rows 20")]
    List {
        /// Which records to show: all, matched, pending or nomatch
        #[arg(long, short = 'f', default_value = "all")]
        filter: StatusFilter,

        /// Stop after this many rows (0 = no limit)
        #[arg(long, default_value = "0")]
        max_rows: usize,
    },

    /// Rank candidate records for one primary record
    #[command(allow_negative_numbers = true)]
    Suggest {
        /// Primary record id
        primary_id: i64,

        /// Shortlist size (defaults to the config's suggest.limit)
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Emit the shortlist as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Record that a primary record matches a candidate record
    #[command(name = "match", allow_negative_numbers = true)]
    Match {
        /// Primary record id
        primary_id: i64,
        /// Candidate record id
        candidate_id: i64,
    },

    /// Record that a primary record has no match
    #[command(allow_negative_numbers = true)]
    NoMatch {
        /// Primary record id
        primary_id: i64,
    },

    /// Clear every saved decision
    Reset {
        /// Confirm clearing all decisions
        #[arg(long)]
        yes: bool,
    },

    /// Write decisions as JSON or CSV
    #[command(after_help = "\
Examples:
  shelfmatch export --format json -o matches.json
  shelfmatch export --format csv > matches.csv")]
    Export {
        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Replace all decisions with the contents of a JSON export
    Import {
        /// JSON file previously written by `export --format json`
        file: PathBuf,
    },

    /// Interactive terminal review
    Review {
        /// Initial filter: all, matched, pending or nomatch
        #[arg(long, short = 'f', default_value = "pending")]
        filter: StatusFilter,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The review screen owns the terminal; console logging would tear it.
    if !matches!(cli.command, Commands::Review { .. }) {
        logging::init(cli.verbose);
    }

    let config = cli.config.as_path();
    let result = match cli.command {
        Commands::Validate => report::cmd_validate(config),
        Commands::Status { json } => report::cmd_status(config, json),
        Commands::List { filter, max_rows } => report::cmd_list(config, filter, max_rows),
        Commands::Suggest { primary_id, limit, json } => {
            report::cmd_suggest(config, primary_id, limit, json)
        }
        Commands::Match { primary_id, candidate_id } => {
            decide::cmd_match(config, primary_id, candidate_id)
        }
        Commands::NoMatch { primary_id } => decide::cmd_no_match(config, primary_id),
        Commands::Reset { yes } => decide::cmd_reset(config, yes),
        Commands::Export { format, output } => export::cmd_export(config, format, output),
        Commands::Import { file } => decide::cmd_import(config, &file),
        Commands::Review { filter } => tui::cmd_review(config, filter),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with its registry exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = review_exit_code(&err);
        let hint = match &err {
            ReconError::Config(ConfigError::Io { .. }) => {
                Some("create shelfmatch.toml or pass --config <path>".to_string())
            }
            ReconError::UnknownPrimary(_) => {
                Some("`shelfmatch list` shows the primary ids".to_string())
            }
            ReconError::Import(_) => Some("saved decisions were left unchanged".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Session
// ============================================================================

pub(crate) fn load_config(path: &Path) -> Result<ReviewConfig, CliError> {
    ReviewConfig::load(path).map_err(|e| CliError::recon(e.into()))
}

/// Load config and catalogs, then hydrate saved decisions.
pub(crate) fn open_session(
    path: &Path,
) -> Result<(ReviewConfig, ReviewSession<FileStore>), CliError> {
    let config = load_config(path)?;
    let session = ReviewSession::from_config(&config).map_err(CliError::recon)?;
    Ok((config, session))
}
