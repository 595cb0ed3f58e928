// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Gridwar: a deterministic turn-based strategy engine on a square grid.
//!
//! Four agents start in the corners of a randomly generated map, gather
//! resources, and fight whoever they walk into until one is left standing.
//! Any seat can be driven by a human or by the built-in greedy script.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Session (paced)  │  Tournament    │
//! ├─────────────────────────────────────┤
//! │      Scripted decision procedure    │
//! ├─────────────────────────────────────┤
//! │  Game rules: map, moves, combat     │
//! └─────────────────────────────────────┘
//! ```

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod tournament;

pub use error::{ActionResult, ConfigError, GameError, IllegalMove};

// Re-export key game types at crate root for convenience
pub use game::{Agent, AgentId, Coord, Direction, Map, Resource, Tile, TileType, WorldState};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generate a new game with a human in seat 0 and insane scripted opponents.
///
/// The same seed always produces the same world. Without a seed one is drawn
/// from the OS.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDimensions`] if either dimension is zero.
pub fn new_game(width: u16, height: u16, seed: Option<u64>) -> Result<WorldState, ConfigError> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    WorldState::generate(width, height, true, game::Difficulty::default(), &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_seeded() {
        let a = new_game(30, 20, Some(99)).unwrap();
        let b = new_game(30, 20, Some(99)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.current_agent_id(), 0);
        assert!(!a.current_agent().is_scripted());
    }

    #[test]
    fn test_new_game_zero_height() {
        assert!(matches!(
            new_game(5, 0, Some(1)),
            Err(ConfigError::InvalidDimensions { width: 5, height: 0 })
        ));
    }
}
