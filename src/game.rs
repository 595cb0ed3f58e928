//! Game layer for Gridwar.
//!
//! Implements the simulation rules:
//! - Map with terrain (grass, forest, mountain, water) and resource deposits
//! - Agents with resources, health and experience
//! - Move validation, resource pickup and turn sequencing
//! - Single-exchange combat resolution
//! - Invariant checks run after every applied move

mod action;
mod agent;
mod combat;
mod invariants;
mod map;
mod mapgen;
mod state;

pub use action::{CombatReport, MoveOutcome, apply_move, pass_turn};
pub use agent::{Agent, AgentId, ControlMode, Difficulty, STARTING_HEALTH, Stockpile};
pub use combat::{
    COMBAT_EXPERIENCE, CombatResult, ELIMINATION_BONUS, attack_power, damage, defense_power,
    is_favorable, resolve_combat,
};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use map::{Coord, Direction, Map, Resource, Tile, TileType};
pub use mapgen::{RESOURCE_CHANCE, generate_map};
pub use state::{SEATS, WorldState, starting_corners};
