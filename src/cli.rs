//! CLI command implementations for Gridwar.

pub(crate) mod play;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use gridwar::config::GameConfig;
use gridwar::game::Difficulty;
use gridwar::{ConfigError, GameError};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Map and agent options shared by every command.
///
/// Flags override values loaded from `--config`.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GameArgs {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map width in tiles
    #[arg(long)]
    width: Option<u16>,

    /// Map height in tiles
    #[arg(long)]
    height: Option<u16>,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Scripted agent temperament
    #[arg(short, long)]
    difficulty: Option<Difficulty>,
}

impl GameArgs {
    /// Resolve the final config: file (or defaults), then flags, then validation.
    pub(crate) fn resolve(&self) -> Result<GameConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Seed to use when none was given, drawn from the OS like every other
/// unseeded RNG in the crate.
pub(crate) fn random_seed() -> u64 {
    rand::random::<u64>()
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level is `warn`, or `debug` with
/// `--verbose`. With a log file every event goes there; `quiet` discards
/// events instead of writing them to stderr.
pub(crate) fn init_tracing(
    verbose: bool,
    log_file: Option<&Path>,
    quiet: bool,
) -> Result<(), CliError> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::new(format!("Failed to open log file {}: {e}", path.display()))
            })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if quiet => builder.with_writer(std::io::sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
