//! Game invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented game. If they do,
//! a resolver has left the world state inconsistent.

use std::collections::HashSet;

use crate::game::WorldState;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &WorldState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if state.agents.is_empty() {
        violations.push(InvariantViolation::new("roster is empty".to_string()));
        return violations;
    }

    if state.turn_cursor >= state.agents.len() {
        violations.push(InvariantViolation::new(format!(
            "turn cursor {} outside roster of {}",
            state.turn_cursor,
            state.agents.len()
        )));
    }

    let mut ids = HashSet::new();
    for agent in &state.agents {
        if !ids.insert(agent.id) {
            violations.push(InvariantViolation::new(format!(
                "agent id {} appears twice",
                agent.id
            )));
        }
        if !state.map.in_bounds(agent.position) {
            violations.push(InvariantViolation::new(format!(
                "agent {} is out of bounds at {}",
                agent.id, agent.position
            )));
        }
        if agent.is_defeated() {
            violations.push(InvariantViolation::new(format!(
                "agent {} has zero health but is still in play",
                agent.id
            )));
        }
    }

    for (coord, tile) in state.map.iter() {
        if tile.resource.is_some() && !tile.tile_type.can_hold_resource() {
            violations.push(InvariantViolation::new(format!(
                "{:?} tile at {coord} carries a resource",
                tile.tile_type
            )));
        }
    }

    match state.winner {
        Some(winner) => {
            if state.agents.len() != 1 || state.agents[0].id != winner {
                violations.push(InvariantViolation::new(format!(
                    "winner {winner} declared with {} agents in play",
                    state.agents.len()
                )));
            }
        }
        None => {
            if state.agents.len() == 1 {
                violations.push(InvariantViolation::new(format!(
                    "agent {} is alone but no winner is set",
                    state.agents[0].id
                )));
            }
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &WorldState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &WorldState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Agent, Coord, Map, Resource, Tile, TileType};

    fn valid_state() -> WorldState {
        let map = Map::new(4, 4).unwrap();
        let agents = vec![
            Agent::human(0, Coord::new(0, 0)),
            Agent::scripted(1, Coord::new(3, 3)),
        ];
        WorldState::from_parts(map, agents).unwrap()
    }

    #[test]
    fn test_valid_state_passes() {
        assert!(check_invariants(&valid_state()).is_empty());
    }

    #[test]
    fn test_cursor_out_of_range() {
        let mut state = valid_state();
        state.turn_cursor = 2;
        assert_eq!(check_invariants(&state).len(), 1);
    }

    #[test]
    fn test_resource_on_water_detected() {
        let mut state = valid_state();
        state
            .map
            .set(Coord::new(1, 1), Tile::with_resource(TileType::Water, Resource::Gold));
        let violations = check_invariants(&state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Water"));
    }

    #[test]
    fn test_winner_mismatch_detected() {
        let mut state = valid_state();
        state.winner = Some(1);
        assert!(!check_invariants(&state).is_empty());
    }

    #[test]
    fn test_defeated_agent_in_roster_detected() {
        let mut state = valid_state();
        state.agents[1].health = 0;
        assert!(!check_invariants(&state).is_empty());
    }

    #[test]
    #[should_panic(expected = "Game invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let mut state = valid_state();
        state.turn_cursor = 7;
        assert_invariants(&state);
    }
}
