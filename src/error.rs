//! Error types for the game engine.
//!
//! Rule violations during play are non-fatal: the state is left untouched and
//! the driver may retry with different input. Only configuration problems are
//! treated as hard failures.

use std::path::PathBuf;

use thiserror::Error;

use crate::game::{AgentId, Coord};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    /// The agent tried to act while it was someone else's turn.
    #[error("agent {agent} acted out of turn (agent {expected} is to move)")]
    OutOfTurn {
        /// The agent that tried to move.
        agent: AgentId,
        /// The agent whose turn it actually is.
        expected: AgentId,
    },
    /// The agent is not in the live roster.
    #[error("agent {0} is not in play")]
    UnknownAgent(AgentId),
    /// The destination tile is water.
    #[error("cannot enter water at {0}")]
    Water(Coord),
    /// A human move was submitted for a scripted seat.
    #[error("agent {0} is controlled by a script")]
    ScriptedSeat(AgentId),
}

/// Non-fatal rejection of an action against the world state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    /// The input violates turn ownership or the terrain rule.
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),
    /// The game already has a winner.
    #[error("game is over (agent {winner} won)")]
    GameOver {
        /// The winning agent.
        winner: AgentId,
    },
}

/// Result type for actions applied to the world state.
pub type ActionResult<T> = Result<T, GameError>;

/// Construction-time failures. These indicate a driver bug, not a game condition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("invalid map dimensions {width}x{height} (both must be > 0)")]
    InvalidDimensions {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
    /// The roster handed to the world state is unusable.
    #[error("invalid roster: {0}")]
    InvalidRoster(String),
    /// The map handed to the world state breaks a terrain rule.
    #[error("invalid map: {0}")]
    InvalidMap(String),
    /// The scripted-turn delay is out of range.
    #[error("scripted delay {0}ms exceeds the 60000ms limit")]
    InvalidDelay(u64),
    /// A config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A config file could not be parsed.
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_move_display() {
        let err = GameError::from(IllegalMove::Water(Coord::new(3, 4)));
        assert_eq!(err.to_string(), "illegal move: cannot enter water at (3, 4)");

        let err = GameError::from(IllegalMove::OutOfTurn { agent: 2, expected: 0 });
        assert!(err.to_string().contains("agent 2 acted out of turn"));
    }

    #[test]
    fn test_game_over_display() {
        let err = GameError::GameOver { winner: 1 };
        assert_eq!(err.to_string(), "game is over (agent 1 won)");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidDimensions { width: 0, height: 5 };
        assert!(err.to_string().contains("0x5"));
    }
}
