//! Interactive game session.
//!
//! Owns one world state at a time and paces scripted turns for a front end.
//! A scripted turn is scheduled a fixed delay after the previous action so a
//! viewer can draw the intermediate frame. Each scheduled turn is stamped with
//! the session generation; restarting bumps the generation, so a turn
//! scheduled against an old world can never fire against a new one.

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::{TurnOutcome, take_scripted_turn};
use crate::config::GameConfig;
use crate::error::{ActionResult, ConfigError, IllegalMove};
use crate::game::{AgentId, ControlMode, Direction, MoveOutcome, WorldState, pass_turn};

/// A scripted turn waiting for its delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTurn {
    /// Session generation the turn was scheduled in.
    pub generation: u64,
    /// Agent expected to act.
    pub agent: AgentId,
    /// Earliest time the turn may fire.
    pub due: Instant,
}

/// A running game plus its scripted-turn schedule.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    rng: ChaCha8Rng,
    state: WorldState,
    generation: u64,
    pending: Option<PendingTurn>,
}

impl Session {
    /// Start a session with a freshly generated world.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(config: GameConfig, now: Instant) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let state = WorldState::generate(
            config.width,
            config.height,
            config.human_seat,
            config.difficulty,
            &mut rng,
        )?;

        let mut session = Self {
            config,
            rng,
            state,
            generation: 0,
            pending: None,
        };
        session.schedule(now);
        Ok(session)
    }

    /// The current world.
    #[must_use]
    pub const fn state(&self) -> &WorldState {
        &self.state
    }

    /// The session config.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of restarts so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The scripted turn waiting to fire, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<PendingTurn> {
        self.pending
    }

    /// The human-controlled agent still in play, if any.
    #[must_use]
    pub fn human_agent(&self) -> Option<AgentId> {
        self.state
            .agents()
            .iter()
            .find(|a| a.control == ControlMode::Human)
            .map(|a| a.id)
    }

    /// Whether the session is waiting on user input.
    #[must_use]
    pub fn awaiting_human(&self) -> bool {
        !self.state.is_terminal() && !self.state.current_agent().is_scripted()
    }

    /// Apply a move chosen by the user for `agent`.
    ///
    /// # Errors
    ///
    /// Rejects moves for scripted seats, plus every error of
    /// [`WorldState::submit_move`]. The world is unchanged on error.
    pub fn submit_human_move(
        &mut self,
        agent: AgentId,
        direction: Direction,
        now: Instant,
    ) -> ActionResult<MoveOutcome> {
        if self.state.agent(agent).is_some_and(|a| a.is_scripted()) {
            return Err(IllegalMove::ScriptedSeat(agent).into());
        }
        let outcome = self.state.submit_move(agent, direction)?;
        self.schedule(now);
        Ok(outcome)
    }

    /// Give up the turn of `agent` without moving.
    ///
    /// The only way out for a human boxed in by water.
    ///
    /// # Errors
    ///
    /// Rejects scripted seats, plus every error of [`pass_turn`]. The world
    /// is unchanged on error.
    pub fn pass_human_turn(&mut self, agent: AgentId, now: Instant) -> ActionResult<()> {
        if self.state.agent(agent).is_some_and(|a| a.is_scripted()) {
            return Err(IllegalMove::ScriptedSeat(agent).into());
        }
        pass_turn(&mut self.state, agent)?;
        self.schedule(now);
        Ok(())
    }

    /// Fire the pending scripted turn if its delay has elapsed.
    ///
    /// Returns `None` when nothing was due.
    pub fn poll(&mut self, now: Instant) -> Option<ActionResult<TurnOutcome>> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.fire(pending, now)
    }

    /// Fire a specific scheduled turn.
    ///
    /// Drivers running their own timers hand the token from [`Self::pending`]
    /// back here. A token from an earlier generation, for an agent who is no
    /// longer to move, or for a finished game is dropped and `None` returned.
    pub fn fire(&mut self, turn: PendingTurn, now: Instant) -> Option<ActionResult<TurnOutcome>> {
        if self.pending != Some(turn) || !self.is_live(turn) {
            tracing::warn!(
                generation = turn.generation,
                agent = turn.agent,
                "dropping stale scripted turn"
            );
            return None;
        }
        self.pending = None;

        let result = take_scripted_turn(&mut self.state);
        self.schedule(now);
        Some(result)
    }

    /// Replace the world with a freshly generated one.
    ///
    /// Any pending scripted turn is abandoned.
    ///
    /// # Errors
    ///
    /// Returns an error if the config no longer describes a valid map.
    pub fn restart(&mut self, now: Instant) -> Result<(), ConfigError> {
        self.state = WorldState::generate(
            self.config.width,
            self.config.height,
            self.config.human_seat,
            self.config.difficulty,
            &mut self.rng,
        )?;
        self.generation += 1;
        self.pending = None;
        tracing::info!(generation = self.generation, "session restarted");
        self.schedule(now);
        Ok(())
    }

    fn is_live(&self, turn: PendingTurn) -> bool {
        turn.generation == self.generation
            && !self.state.is_terminal()
            && self.state.current_agent_id() == turn.agent
    }

    /// Queue the next scripted turn, or clear the queue if the next move
    /// belongs to a human or the game is over.
    fn schedule(&mut self, now: Instant) {
        self.pending = if self.state.is_terminal() || !self.state.current_agent().is_scripted() {
            None
        } else {
            Some(PendingTurn {
                generation: self.generation,
                agent: self.state.current_agent_id(),
                due: now + self.config.scripted_delay(),
            })
        };
    }
}
