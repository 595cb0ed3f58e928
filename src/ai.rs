//! Decision procedure for scripted agents.
//!
//! A one-ply greedy scorer: each cardinal neighbor is scored on what is
//! standing on it, and the best-scoring direction wins. There is no
//! lookahead and no randomness, so the same state always yields the same
//! choice.

use serde::Serialize;

use crate::error::{ActionResult, GameError, IllegalMove};
use crate::game::{
    Agent, AgentId, Direction, MoveOutcome, WorldState, apply_move, is_favorable, pass_turn,
};

/// Score for a destination holding a resource.
const RESOURCE_SCORE: i32 = 10;
/// Score for a destination holding an agent we can out-power.
const FAVORABLE_FIGHT_SCORE: i32 = 20;
/// Score for a destination holding an agent we cannot out-power.
const UNFAVORABLE_FIGHT_SCORE: i32 = -20;
/// Every subtotal is scaled by this.
const AGGRESSION_MULTIPLIER: i32 = 2;

/// A scripted agent's chosen move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Direction to move.
    pub direction: Direction,
    /// Score of the chosen direction, `None` if no direction was viable.
    pub score: Option<i32>,
}

impl Decision {
    /// Whether every candidate was blocked and the direction is a default.
    #[must_use]
    pub const fn is_forced(&self) -> bool {
        self.score.is_none()
    }
}

/// Score moving `agent` one step in `direction`.
///
/// Returns `None` if the destination is water.
#[must_use]
pub fn score_direction(state: &WorldState, agent: &Agent, direction: Direction) -> Option<i32> {
    let target = state.map().step(agent.position, direction);
    let tile = state.map().get(target)?;
    if !tile.tile_type.is_passable() {
        return None;
    }

    let mut score = 0;
    if tile.resource.is_some() {
        score += RESOURCE_SCORE;
    }

    if let Some(opponent) = state.occupant(target, agent.id) {
        if is_favorable(agent, opponent) {
            if agent.difficulty.seeks_combat() {
                score += FAVORABLE_FIGHT_SCORE;
            }
        } else {
            score += UNFAVORABLE_FIGHT_SCORE;
        }
    }

    Some(score * AGGRESSION_MULTIPLIER)
}

/// Score every direction in evaluation order.
#[must_use]
pub fn score_all(state: &WorldState, agent: &Agent) -> [(Direction, Option<i32>); 4] {
    Direction::ALL.map(|direction| (direction, score_direction(state, agent, direction)))
}

/// Choose a move for `agent`.
///
/// The first direction whose score strictly beats every earlier one wins, so
/// ties go to the earlier direction in left, right, up, down order. If every
/// destination is water the agent defaults to left.
///
/// Returns `None` if the agent is not in play.
#[must_use]
pub fn decide(state: &WorldState, agent: AgentId) -> Option<Decision> {
    let agent = state.agent(agent)?;

    let mut best = Decision {
        direction: Direction::Left,
        score: None,
    };
    for (direction, score) in score_all(state, agent) {
        let Some(score) = score else {
            continue;
        };
        if best.score.is_none_or(|best_score| score > best_score) {
            best = Decision {
                direction,
                score: Some(score),
            };
        }
    }

    Some(best)
}

/// What a scripted turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnOutcome {
    /// The agent moved.
    Moved(MoveOutcome),
    /// Every direction was blocked; the turn passed without movement.
    Passed {
        /// The agent that passed.
        agent: AgentId,
    },
}

impl TurnOutcome {
    /// The agent that acted.
    #[must_use]
    pub const fn agent(&self) -> AgentId {
        match self {
            TurnOutcome::Moved(outcome) => outcome.agent,
            TurnOutcome::Passed { agent } => *agent,
        }
    }
}

/// Decide and apply a move for whichever agent's turn it is.
///
/// A forced decision (all neighbors water) still consumes the turn, so a
/// boxed-in agent cannot stall the game.
///
/// # Errors
///
/// Returns [`GameError::GameOver`] once the game is decided.
pub fn take_scripted_turn(state: &mut WorldState) -> ActionResult<TurnOutcome> {
    if let Some(winner) = state.winner() {
        return Err(GameError::GameOver { winner });
    }

    let agent = state.current_agent_id();
    let decision = decide(state, agent).ok_or(IllegalMove::UnknownAgent(agent))?;

    if decision.is_forced() {
        tracing::debug!(agent, "boxed in, passing");
        pass_turn(state, agent)?;
        return Ok(TurnOutcome::Passed { agent });
    }

    let outcome = apply_move(state, agent, decision.direction)?;
    Ok(TurnOutcome::Moved(outcome))
}
