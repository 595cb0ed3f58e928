//! Headless game runner.
//!
//! Provides a pure function interface: `(seed, config) -> GameResult`
//!
//! Every seat is scripted, so a game needs no input and no clock. Games that
//! fail to produce a winner within the turn cap end in a draw. Batches of
//! games run in parallel with rayon, each thread folding results into its
//! own [`TournamentStats`] before a final merge.

// Stats divide integer counters into floating-point rates
#![allow(clippy::cast_precision_loss)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::ai::{TurnOutcome, take_scripted_turn};
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError};
use crate::game::{Agent, AgentId, SEATS, Stockpile, WorldState};

/// Configuration for a batch of headless games.
#[derive(Debug, Clone, Copy)]
pub struct TournamentConfig {
    /// Number of games to play.
    pub games: u64,
    /// Seed of the first game; game `i` uses `base_seed + i`.
    pub base_seed: u64,
    /// Turn cap per game. Reaching it is a draw.
    pub max_turns: u32,
    /// Map and agent settings shared by every game.
    pub game: GameConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            games: 1000,
            base_seed: 0,
            max_turns: 1000,
            game: GameConfig {
                width: 64,
                height: 64,
                human_seat: false,
                scripted_delay_ms: 0,
                ..GameConfig::default()
            },
        }
    }
}

/// Final numbers for one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    /// Agent id.
    pub id: AgentId,
    /// Health at the end of the game, zero if eliminated.
    pub health: u32,
    /// Experience at the end of the game or at elimination.
    pub experience: u32,
    /// Holdings at the end of the game or just before elimination.
    pub resources: Stockpile,
    /// Turn the agent was eliminated on, `None` if it survived.
    pub eliminated_turn: Option<u32>,
}

impl AgentSummary {
    fn survivor(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            health: agent.health,
            experience: agent.experience,
            resources: agent.resources,
            eliminated_turn: None,
        }
    }
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// The seed used for this game.
    pub seed: u64,
    /// The last agent standing, `None` if the turn cap was hit.
    pub winner: Option<AgentId>,
    /// Total turns played.
    pub turns_played: u32,
    /// Per-seat summaries in seat order.
    pub agents: Vec<AgentSummary>,
    /// Elimination order (first eliminated is index 0).
    pub elimination_order: Vec<AgentId>,
}

/// Play one all-scripted game to completion.
///
/// # Errors
///
/// Returns an error if `config` does not describe a valid map.
pub fn run_game(seed: u64, config: &GameConfig, max_turns: u32) -> Result<GameResult, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = WorldState::generate(
        config.width,
        config.height,
        false,
        config.difficulty,
        &mut rng,
    )?;
    Ok(play_out(seed, &mut state, max_turns))
}

/// Play scripted turns on `state` until it is decided or `max_turns` is hit.
#[must_use]
pub fn play_out(seed: u64, state: &mut WorldState, max_turns: u32) -> GameResult {
    let mut summaries: Vec<AgentSummary> =
        state.agents().iter().map(AgentSummary::survivor).collect();
    let mut elimination_order = Vec::new();

    while state.turn_count() < max_turns {
        let before: Vec<Agent> = state.agents().to_vec();
        let outcome = match take_scripted_turn(state) {
            Ok(outcome) => outcome,
            Err(GameError::GameOver { .. }) => break,
            Err(err) => {
                tracing::warn!(seed, %err, "scripted turn rejected");
                break;
            }
        };

        if let TurnOutcome::Moved(outcome) = outcome
            && let Some(report) = outcome.combat.filter(|c| c.eliminated)
            && let Some(fallen) = before.iter().find(|a| a.id == report.defender)
            && let Some(summary) = summaries.iter_mut().find(|s| s.id == report.defender)
        {
            *summary = AgentSummary {
                health: 0,
                eliminated_turn: Some(state.turn_count()),
                ..AgentSummary::survivor(fallen)
            };
            elimination_order.push(report.defender);
        }
    }

    for agent in state.agents() {
        if let Some(summary) = summaries.iter_mut().find(|s| s.id == agent.id) {
            *summary = AgentSummary::survivor(agent);
        }
    }

    tracing::debug!(
        seed,
        winner = ?state.winner(),
        turns = state.turn_count(),
        "game finished"
    );

    GameResult {
        seed,
        winner: state.winner(),
        turns_played: state.turn_count(),
        agents: summaries,
        elimination_order,
    }
}

/// Aggregated results over many games, indexed by seat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentStats {
    /// Total games played.
    pub games_played: u64,
    /// Win count per seat.
    pub wins: Vec<u64>,
    /// Games that hit the turn cap.
    pub draws: u64,
    /// Games each seat was still standing at the end of.
    pub survivals: Vec<u64>,
    /// Final experience sum per seat.
    total_experience: Vec<f64>,
    /// Experience sum of squares for std dev calculation.
    experience_sq_sums: Vec<f64>,
    /// Total turns across all games.
    total_turns: u64,
}

impl TournamentStats {
    /// Create empty stats for `seats` seats.
    #[must_use]
    pub fn new(seats: usize) -> Self {
        Self {
            games_played: 0,
            wins: vec![0; seats],
            draws: 0,
            survivals: vec![0; seats],
            total_experience: vec![0.0; seats],
            experience_sq_sums: vec![0.0; seats],
            total_turns: 0,
        }
    }

    /// Add a game result to the stats.
    pub fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);

        match result.winner {
            Some(winner) => {
                if let Some(wins) = self.wins.get_mut(usize::from(winner)) {
                    *wins += 1;
                }
            }
            None => self.draws += 1,
        }

        for summary in &result.agents {
            let seat = usize::from(summary.id);
            if seat >= self.total_experience.len() {
                continue;
            }
            let experience = f64::from(summary.experience);
            self.total_experience[seat] += experience;
            self.experience_sq_sums[seat] += experience * experience;
            if summary.eliminated_turn.is_none() {
                self.survivals[seat] += 1;
            }
        }
    }

    /// Fold another set of stats into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.total_turns += other.total_turns;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.survivals.iter_mut().zip(&other.survivals) {
            *a += b;
        }
        for (a, b) in self.total_experience.iter_mut().zip(&other.total_experience) {
            *a += b;
        }
        for (a, b) in self.experience_sq_sums.iter_mut().zip(&other.experience_sq_sums) {
            *a += b;
        }
    }

    /// Win rate for a seat (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self, seat: usize) -> f64 {
        self.rate(self.wins.get(seat).copied().unwrap_or(0))
    }

    /// Fraction of games drawn.
    #[must_use]
    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    /// Mean final experience for a seat.
    #[must_use]
    pub fn avg_experience(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_experience.get(seat).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Standard deviation of final experience for a seat.
    #[must_use]
    pub fn experience_std_dev(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let mean = self.avg_experience(seat);
        let sq_sum = self.experience_sq_sums.get(seat).copied().unwrap_or(0.0);
        let variance = sq_sum / self.games_played as f64 - mean * mean;
        variance.max(0.0).sqrt()
    }

    /// Mean game length in turns.
    #[must_use]
    pub fn avg_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }

    fn rate(&self, count: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        count as f64 / self.games_played as f64
    }
}

/// Run a batch of games in parallel.
///
/// # Errors
///
/// Returns an error if the game config is invalid. Nothing is played then.
pub fn run_tournament(config: &TournamentConfig) -> Result<TournamentStats, ConfigError> {
    config.game.validate()?;

    let stats = (0..config.games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(SEATS),
            |mut local, i| {
                let seed = config.base_seed.wrapping_add(i);
                if let Ok(result) = run_game(seed, &config.game, config.max_turns) {
                    local.add_result(&result);
                }
                local
            },
        )
        .reduce(
            || TournamentStats::new(SEATS),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    tracing::info!(
        games = stats.games_played,
        draws = stats.draws,
        "tournament finished"
    );
    Ok(stats)
}
