//! Gridwar CLI - play, run and batch-simulate Gridwar games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Gridwar - a turn-based grid strategy game
#[derive(Parser, Debug)]
#[command(name = "gridwar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively against three scripted agents
    Play {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Delay before each scripted turn in milliseconds (default: 500)
        #[arg(long)]
        delay: Option<u64>,

        /// Watch four scripted agents instead of playing
        #[arg(long)]
        spectate: bool,

        /// Write logs to this file instead of discarding them
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Run a single headless game between scripted agents
    Run {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Maximum turns before the game is called a draw (default: 1000)
        #[arg(short, long, default_value = "1000")]
        turns: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the preamble
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run mass parallel games and aggregate statistics
    Tournament {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum turns per game (default: 1000)
        #[arg(short = 't', long, default_value = "1000")]
        max_turns: u32,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn run(args: Args) -> Result<(), cli::CliError> {
    match args.command {
        Commands::Play {
            game,
            delay,
            spectate,
            log_file,
        } => {
            cli::init_tracing(args.verbose, log_file.as_deref(), true)?;
            cli::play::execute(&game, delay, spectate)
        }

        Commands::Run {
            game,
            turns,
            format,
            quiet,
        } => {
            cli::init_tracing(args.verbose, None, false)?;
            cli::run::execute(&game, turns, format, quiet)
        }

        Commands::Tournament {
            game,
            games,
            threads,
            max_turns,
            format,
            progress,
        } => {
            cli::init_tracing(args.verbose, None, false)?;
            cli::tournament::execute(&game, games, threads, max_turns, format, progress)
        }
    }
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
