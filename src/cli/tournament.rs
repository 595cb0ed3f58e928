//! Tournament command implementation.

// Rates divide integer counters
#![allow(clippy::cast_precision_loss)]

use super::output::{JsonTournamentResult, format_tournament_csv, format_tournament_text};
use super::{CliError, GameArgs, TournamentFormat, random_seed};
use gridwar::tournament::{TournamentConfig, run_tournament};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
pub(crate) fn execute(
    game: &GameArgs,
    games: u64,
    threads: Option<usize>,
    max_turns: u32,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let mut game_config = game.resolve()?;
    game_config.human_seat = false;
    let config = TournamentConfig {
        games,
        base_seed: game_config.seed.unwrap_or_else(random_seed),
        max_turns,
        game: game_config,
    };

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_tournament(&config)?;

    // Progress is settled once at the end; the hot path stays lock-free
    if let Some(pb) = pb {
        pb.set_position(stats.games_played);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            println!(
                "Map {}x{}, seeds {}..{}, {:?} agents",
                config.game.width,
                config.game.height,
                config.base_seed,
                config.base_seed.wrapping_add(games),
                config.game.difficulty
            );
            print!("{}", format_tournament_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.0} games/sec)",
                duration.as_secs_f64()
            );
        }
        TournamentFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonTournamentResult::from_stats(&stats))?;
            println!("{json}");
        }
        TournamentFormat::Csv => print!("{}", format_tournament_csv(&stats)),
    }

    Ok(())
}
