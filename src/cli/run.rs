//! Run command implementation.

use super::output::format_text;
use super::{CliError, GameArgs, OutputFormat, random_seed};
use gridwar::tournament::run_game;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
pub(crate) fn execute(
    game: &GameArgs,
    max_turns: u32,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let config = game.resolve()?;
    let seed = config.seed.unwrap_or_else(random_seed);

    if !quiet && format == OutputFormat::Text {
        println!(
            "Running {}x{} game with seed {seed} ({:?} agents)...",
            config.width, config.height, config.difficulty
        );
        println!();
    }

    let result = run_game(seed, &config, max_turns)?;

    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
