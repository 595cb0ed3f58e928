//! World state and turn sequencing.

use std::collections::HashSet;

use rand::Rng;

use crate::error::ConfigError;
use crate::game::{Agent, AgentId, ControlMode, Coord, Difficulty, Map, generate_map};

/// Number of agents in a freshly generated game.
pub const SEATS: usize = 4;

/// Complete game state.
///
/// The roster order is the turn order. Eliminated agents are removed from
/// the roster, and the turn cursor is kept pointing at a live agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldState {
    /// The game map.
    pub(crate) map: Map,
    /// Live agents in turn order.
    pub(crate) agents: Vec<Agent>,
    /// Index into `agents` of the agent to move next.
    pub(crate) turn_cursor: usize,
    /// Number of turns taken so far.
    pub(crate) turn_count: u32,
    /// Sole survivor, once the game is decided.
    pub(crate) winner: Option<AgentId>,
}

impl WorldState {
    /// Generate a fresh game: a random map with four agents in the corners.
    ///
    /// Agent 0 is human-controlled when `human_seat` is set; every other seat
    /// is scripted with the given difficulty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDimensions`] if either dimension is zero.
    pub fn generate<R: Rng + ?Sized>(
        width: u16,
        height: u16,
        human_seat: bool,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let map = generate_map(width, height, rng)?;
        let agents = starting_corners(width, height)
            .into_iter()
            .zip(0..)
            .map(|(corner, id): (Coord, AgentId)| {
                let control = if human_seat && id == 0 {
                    ControlMode::Human
                } else {
                    ControlMode::Scripted
                };
                let mut agent = Agent::new(id, corner, control);
                agent.difficulty = difficulty;
                agent
            })
            .collect();

        Self::from_parts(map, agents)
    }

    /// Build a state from an explicit map and roster.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRoster`] if the roster is empty, has
    /// duplicate ids, holds an agent with zero health, or places an agent out
    /// of bounds. Returns [`ConfigError::InvalidMap`] if a resource sits on
    /// a tile that cannot hold one.
    pub fn from_parts(map: Map, agents: Vec<Agent>) -> Result<Self, ConfigError> {
        if agents.is_empty() {
            return Err(ConfigError::InvalidRoster("no agents".to_string()));
        }

        let mut seen = HashSet::new();
        for agent in &agents {
            if !seen.insert(agent.id) {
                return Err(ConfigError::InvalidRoster(format!(
                    "duplicate agent id {}",
                    agent.id
                )));
            }
            if agent.is_defeated() {
                return Err(ConfigError::InvalidRoster(format!(
                    "agent {} starts with zero health",
                    agent.id
                )));
            }
            if !map.in_bounds(agent.position) {
                return Err(ConfigError::InvalidRoster(format!(
                    "agent {} at {} is outside the {}x{} map",
                    agent.id,
                    agent.position,
                    map.width(),
                    map.height()
                )));
            }
        }

        if let Some((coord, tile)) = map
            .iter()
            .find(|(_, t)| t.resource.is_some() && !t.tile_type.can_hold_resource())
        {
            return Err(ConfigError::InvalidMap(format!(
                "{:?} tile at {coord} carries a resource",
                tile.tile_type
            )));
        }

        let winner = if agents.len() == 1 {
            Some(agents[0].id)
        } else {
            None
        };

        Ok(Self {
            map,
            agents,
            turn_cursor: 0,
            turn_count: 0,
            winner,
        })
    }

    /// The game map.
    #[must_use]
    pub const fn map(&self) -> &Map {
        &self.map
    }

    /// Live agents in turn order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Get an agent by id.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Roster index of an agent.
    #[must_use]
    pub(crate) fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }

    /// First agent other than `id` standing on `coord`.
    #[must_use]
    pub fn occupant(&self, coord: Coord, id: AgentId) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|a| a.id != id && a.position == coord)
    }

    /// The agent whose turn it is.
    #[must_use]
    pub fn current_agent(&self) -> &Agent {
        &self.agents[self.turn_cursor]
    }

    /// Id of the agent whose turn it is.
    #[must_use]
    pub fn current_agent_id(&self) -> AgentId {
        self.current_agent().id
    }

    /// Index into the roster of the agent to move next.
    #[must_use]
    pub const fn turn_cursor(&self) -> usize {
        self.turn_cursor
    }

    /// Number of turns taken so far.
    #[must_use]
    pub const fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// The winner, once only one agent remains.
    #[must_use]
    pub const fn winner(&self) -> Option<AgentId> {
        self.winner
    }

    /// Check if the game is over. No further mutation happens once it is.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Pass the turn to the next agent.
    ///
    /// No-op once the game is over.
    pub fn advance_turn(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.turn_cursor = (self.turn_cursor + 1) % self.agents.len();
        self.turn_count += 1;
    }

    /// Remove an agent from the roster.
    ///
    /// The cursor keeps pointing at the same live agent it did before. If
    /// this leaves a single agent, that agent becomes the winner and the
    /// state freezes. Returns the removed agent, or `None` if the id is not
    /// in play or the game is already over.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        if self.is_terminal() {
            return None;
        }
        let idx = self.index_of(id)?;
        let removed = self.agents.remove(idx);

        if idx < self.turn_cursor {
            self.turn_cursor -= 1;
        }
        if self.turn_cursor >= self.agents.len() {
            self.turn_cursor = 0;
        }

        if self.agents.len() == 1 {
            let winner = self.agents[0].id;
            self.winner = Some(winner);
            tracing::info!(winner, turn = self.turn_count, "game decided");
        }

        Some(removed)
    }
}

/// The four corners of a `width` x `height` map, in seat order.
#[must_use]
pub fn starting_corners(width: u16, height: u16) -> [Coord; SEATS] {
    let max_x = width.saturating_sub(1);
    let max_y = height.saturating_sub(1);
    [
        Coord::new(0, 0),
        Coord::new(max_x, 0),
        Coord::new(0, max_y),
        Coord::new(max_x, max_y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Resource, Stockpile, Tile, TileType, check_invariants};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_game() -> WorldState {
        let map = Map::new(10, 10).unwrap();
        let agents = vec![
            Agent::human(0, Coord::new(0, 0)),
            Agent::scripted(1, Coord::new(9, 0)),
            Agent::scripted(2, Coord::new(0, 9)),
            Agent::scripted(3, Coord::new(9, 9)),
        ];
        WorldState::from_parts(map, agents).unwrap()
    }

    #[test]
    fn test_generated_game_setup() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let game = WorldState::generate(20, 15, true, Difficulty::Insane, &mut rng).unwrap();

        assert_eq!(game.agents().len(), 4);
        assert_eq!(game.turn_cursor(), 0);
        assert_eq!(game.turn_count(), 0);
        assert_eq!(game.winner(), None);

        let positions: Vec<_> = game.agents().iter().map(|a| a.position).collect();
        assert_eq!(
            positions,
            vec![
                Coord::new(0, 0),
                Coord::new(19, 0),
                Coord::new(0, 14),
                Coord::new(19, 14)
            ]
        );
        for agent in game.agents() {
            assert_eq!(agent.resources, Stockpile::STARTING);
            assert_eq!(agent.health, 100);
            assert_eq!(agent.experience, 0);
            assert_eq!(agent.is_scripted(), agent.id != 0);
        }
    }

    #[test]
    fn test_generate_without_human_seat() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let game = WorldState::generate(8, 8, false, Difficulty::Easy, &mut rng).unwrap();
        assert!(game.agents().iter().all(Agent::is_scripted));
        assert!(game.agents().iter().all(|a| a.difficulty == Difficulty::Easy));
    }

    #[test]
    fn test_generate_rejects_zero_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(WorldState::generate(0, 8, true, Difficulty::Insane, &mut rng).is_err());
    }

    #[test]
    fn test_from_parts_validation() {
        let map = Map::new(4, 4).unwrap();
        assert!(WorldState::from_parts(map.clone(), vec![]).is_err());
        assert!(
            WorldState::from_parts(
                map.clone(),
                vec![Agent::human(0, Coord::new(0, 0)), Agent::scripted(0, Coord::new(1, 1))]
            )
            .is_err()
        );
        assert!(WorldState::from_parts(map, vec![Agent::human(0, Coord::new(4, 0))]).is_err());
    }

    #[test]
    fn test_from_parts_rejects_defeated_agent() {
        let map = Map::new(4, 1).unwrap();
        let mut fallen = Agent::scripted(1, Coord::new(3, 0));
        fallen.health = 0;
        assert!(matches!(
            WorldState::from_parts(map, vec![Agent::human(0, Coord::new(0, 0)), fallen]),
            Err(ConfigError::InvalidRoster(_))
        ));
    }

    #[test]
    fn test_from_parts_rejects_resource_on_mountain() {
        let mut map = Map::new(4, 1).unwrap();
        map.set(
            Coord::new(2, 0),
            Tile::with_resource(TileType::Mountain, Resource::Gold),
        );
        let result = WorldState::from_parts(
            map,
            vec![Agent::human(0, Coord::new(0, 0)), Agent::scripted(1, Coord::new(3, 0))],
        );
        assert!(matches!(result, Err(ConfigError::InvalidMap(msg)) if msg.contains("(2, 0)")));
    }

    #[test]
    fn test_from_parts_rejects_resource_on_water() {
        let mut map = Map::new(3, 3).unwrap();
        map.set(
            Coord::new(1, 1),
            Tile::with_resource(TileType::Water, Resource::Food),
        );
        let result = WorldState::from_parts(map, vec![Agent::human(0, Coord::new(0, 0))]);
        assert!(matches!(result, Err(ConfigError::InvalidMap(_))));
    }

    #[test]
    fn test_accepted_state_moves_without_violations() {
        let mut map = Map::new(4, 1).unwrap();
        map.set(
            Coord::new(2, 0),
            Tile::with_resource(TileType::Forest, Resource::Gold),
        );
        let mut state = WorldState::from_parts(
            map,
            vec![Agent::human(0, Coord::new(0, 0)), Agent::scripted(1, Coord::new(3, 0))],
        )
        .unwrap();
        assert!(check_invariants(&state).is_empty());
        state.submit_move(0, Direction::Right).unwrap();
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_advance_turn_wraps() {
        let mut game = create_test_game();
        for expected in [1, 2, 3, 0, 1] {
            game.advance_turn();
            assert_eq!(game.current_agent_id(), expected);
        }
        assert_eq!(game.turn_count(), 5);
    }

    #[test]
    fn test_remove_agent_before_cursor_keeps_current() {
        let mut game = create_test_game();
        game.advance_turn();
        game.advance_turn();
        assert_eq!(game.current_agent_id(), 2);

        game.remove_agent(1).unwrap();
        assert_eq!(game.current_agent_id(), 2);
        assert_eq!(game.agents().len(), 3);
    }

    #[test]
    fn test_remove_current_last_agent_wraps_cursor() {
        let mut game = create_test_game();
        for _ in 0..3 {
            game.advance_turn();
        }
        assert_eq!(game.current_agent_id(), 3);

        game.remove_agent(3).unwrap();
        assert_eq!(game.turn_cursor(), 0);
        assert_eq!(game.current_agent_id(), 0);
    }

    #[test]
    fn test_last_agent_standing_wins() {
        let mut game = create_test_game();
        game.remove_agent(1).unwrap();
        game.remove_agent(2).unwrap();
        assert!(!game.is_terminal());
        game.remove_agent(3).unwrap();

        assert!(game.is_terminal());
        assert_eq!(game.winner(), Some(0));
        assert_eq!(game.current_agent_id(), 0);
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut game = create_test_game();
        for id in 1..4 {
            game.remove_agent(id);
        }
        let before = game.clone();

        game.advance_turn();
        assert!(game.remove_agent(0).is_none());
        assert_eq!(game, before);
    }

    #[test]
    fn test_remove_unknown_agent() {
        let mut game = create_test_game();
        assert!(game.remove_agent(42).is_none());
        assert_eq!(game.agents().len(), 4);
    }

    #[test]
    fn test_starting_corners_degenerate_map() {
        let corners = starting_corners(1, 1);
        assert!(corners.iter().all(|c| *c == Coord::new(0, 0)));
    }
}
