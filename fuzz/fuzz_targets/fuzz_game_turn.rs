#![no_main]

//! Full game turn fuzzer.
//!
//! Builds a small world from fuzzer input, then replays an arbitrary mix of
//! human moves, scripted turns and passes:
//! 1. Illegal moves must leave the state untouched
//! 2. Legal moves must advance the turn count by one
//! 3. Invariants must hold after every action
//! 4. A decided game must never change again

use arbitrary::Arbitrary;
use gridwar::ai::take_scripted_turn;
use gridwar::game::{
    Agent, Coord, Direction, Map, Resource, Tile, TileType, WorldState, check_invariants,
    pass_turn,
};
use libfuzzer_sys::fuzz_target;

const SIZE: u16 = 8;

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    /// Move an agent (possibly out of turn).
    Move { agent: u8, direction: u8 },
    /// Let the script play whoever is to move.
    Scripted,
    /// Pass for an agent (possibly out of turn).
    Pass { agent: u8 },
}

/// Structured input for full game turn fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    /// Terrain and resource byte per tile.
    tiles: [u8; 64],
    /// Starting positions, weapons and experience for up to four agents.
    agents: Vec<(u8, u8, u8, u8)>,
    /// Actions to replay.
    actions: Vec<FuzzAction>,
}

fn tile_from_byte(byte: u8) -> Tile {
    let tile_type = match byte % 4 {
        0 => TileType::Grass,
        1 => TileType::Forest,
        2 => TileType::Mountain,
        _ => TileType::Water,
    };
    let resource = match byte / 4 % 8 {
        0 => Some(Resource::Gold),
        1 => Some(Resource::Food),
        2 => Some(Resource::Weapon),
        _ => None,
    };
    match resource {
        Some(resource) if tile_type.can_hold_resource() => Tile::with_resource(tile_type, resource),
        _ => Tile::new(tile_type),
    }
}

fuzz_target!(|input: GameTurnInput| {
    let Some(mut map) = Map::new(SIZE, SIZE) else {
        return;
    };
    for (i, byte) in input.tiles.iter().enumerate() {
        let coord = Coord::new(i as u16 % SIZE, i as u16 / SIZE);
        map.set(coord, tile_from_byte(*byte));
    }

    let agents: Vec<Agent> = input
        .agents
        .iter()
        .take(4)
        .enumerate()
        .map(|(id, &(x, y, weapon, experience))| {
            let mut agent = Agent::scripted(id as u8, Coord::new(u16::from(x) % SIZE, u16::from(y) % SIZE));
            agent.resources.weapon = u32::from(weapon);
            agent.experience = u32::from(experience);
            agent
        })
        .collect();

    let Ok(mut state) = WorldState::from_parts(map, agents) else {
        return;
    };

    for action in input.actions.into_iter().take(200) {
        let before = state.clone();
        let applied = match action {
            FuzzAction::Move { agent, direction } => {
                let direction = Direction::ALL[usize::from(direction % 4)];
                state.submit_move(agent % 5, direction).is_ok()
            }
            FuzzAction::Scripted => take_scripted_turn(&mut state).is_ok(),
            FuzzAction::Pass { agent } => pass_turn(&mut state, agent % 5).is_ok(),
        };

        if applied {
            assert_eq!(state.turn_count(), before.turn_count() + 1);
        } else {
            assert_eq!(state, before, "rejected {action:?} changed the state");
        }
        if before.is_terminal() {
            assert_eq!(state, before, "decided game changed after {action:?}");
        }

        let violations = check_invariants(&state);
        assert!(
            violations.is_empty(),
            "Invariants violated after {action:?}: {violations:?}"
        );
    }
});
