//! Move validation and application.

use serde::Serialize;

use crate::error::{ActionResult, GameError, IllegalMove};
use crate::game::{
    AgentId, Coord, Direction, Resource, Tile, WorldState, assert_invariants, resolve_combat,
};

/// What happened when the mover fought the occupant of its new cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatReport {
    /// The agent that was attacked.
    pub defender: AgentId,
    /// Damage dealt.
    pub damage: u32,
    /// Whether the defender was removed from the game.
    pub eliminated: bool,
}

/// Result of an applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// The agent that moved.
    pub agent: AgentId,
    /// Where the agent started.
    pub from: Coord,
    /// Where the agent ended up. Equal to `from` when clamped at the edge.
    pub to: Coord,
    /// Resource picked up on arrival.
    pub collected: Option<Resource>,
    /// Fight triggered on arrival.
    pub combat: Option<CombatReport>,
    /// Winner, if this move decided the game.
    pub winner: Option<AgentId>,
}

/// Check that `agent` may act right now.
///
/// Returns the roster index of the agent.
fn check_turn(state: &WorldState, agent: AgentId) -> ActionResult<usize> {
    if let Some(winner) = state.winner {
        return Err(GameError::GameOver { winner });
    }

    let expected = state.current_agent_id();
    if expected != agent {
        if state.index_of(agent).is_none() {
            return Err(IllegalMove::UnknownAgent(agent).into());
        }
        return Err(IllegalMove::OutOfTurn { agent, expected }.into());
    }

    Ok(state.turn_cursor)
}

/// Apply a single-step move for `agent`.
///
/// The target is clamped to the map edge. Entering water is rejected without
/// consuming the turn. Otherwise the agent moves, collects any resource on
/// the tile, fights any agent already standing there, and the turn passes to
/// the next live agent.
///
/// # Errors
///
/// Returns [`GameError::GameOver`] once a winner exists and
/// [`GameError::IllegalMove`] for out-of-turn, unknown-agent or water moves.
/// The state is unchanged on every error.
pub fn apply_move(
    state: &mut WorldState,
    agent: AgentId,
    direction: Direction,
) -> ActionResult<MoveOutcome> {
    let idx = check_turn(state, agent)?;

    let from = state.agents[idx].position;
    let to = state.map.step(from, direction);
    let passable = state.map.get(to).is_some_and(|t| t.tile_type.is_passable());
    if !passable {
        return Err(IllegalMove::Water(to).into());
    }

    let collected = state.map.get_mut(to).and_then(Tile::take_resource);
    let mover = &mut state.agents[idx];
    mover.position = to;
    if let Some(resource) = collected {
        mover.resources.add(resource);
        mover.gain_experience(1);
        tracing::debug!(agent, ?resource, %to, "resource collected");
    }
    tracing::debug!(agent, %direction, %from, %to, "moved");

    let defender = state.occupant(to, agent).map(|a| a.id);
    let combat = defender.map(|defender| fight(state, idx, defender));

    state.turn_count += 1;
    if !state.is_terminal() {
        // Elimination may have shifted the mover's index
        if let Some(mover_idx) = state.index_of(agent) {
            state.turn_cursor = (mover_idx + 1) % state.agents.len();
        }
    }

    assert_invariants(state);

    Ok(MoveOutcome {
        agent,
        from,
        to,
        collected,
        combat,
        winner: state.winner,
    })
}

/// Resolve a fight between the agent at `attacker_idx` and `defender`, then
/// commit both results at once.
fn fight(state: &mut WorldState, attacker_idx: usize, defender: AgentId) -> CombatReport {
    let Some(defender_idx) = state.index_of(defender) else {
        return CombatReport {
            defender,
            damage: 0,
            eliminated: false,
        };
    };

    let result = resolve_combat(&state.agents[attacker_idx], &state.agents[defender_idx]);
    let attacker = result.attacker.id;
    state.agents[attacker_idx] = result.attacker;

    if result.defender_eliminated {
        tracing::info!(attacker, defender, damage = result.damage, "agent eliminated");
        state.remove_agent(defender);
    } else {
        state.agents[defender_idx] = result.defender;
        tracing::debug!(attacker, defender, damage = result.damage, "combat");
    }

    CombatReport {
        defender,
        damage: result.damage,
        eliminated: result.defender_eliminated,
    }
}

/// Give up the turn without moving.
///
/// # Errors
///
/// Same turn-ownership errors as [`apply_move`].
pub fn pass_turn(state: &mut WorldState, agent: AgentId) -> ActionResult<()> {
    check_turn(state, agent)?;
    state.advance_turn();
    tracing::debug!(agent, "turn passed");
    Ok(())
}

impl WorldState {
    /// Submit a move for `agent`. See [`apply_move`].
    ///
    /// # Errors
    ///
    /// Returns an error and leaves the state unchanged if the move is illegal
    /// or the game is over.
    pub fn submit_move(&mut self, agent: AgentId, direction: Direction) -> ActionResult<MoveOutcome> {
        apply_move(self, agent, direction)
    }
}
