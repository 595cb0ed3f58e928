//! Agent state.

use serde::{Deserialize, Serialize};

use crate::game::{Coord, Resource};

/// Unique identifier for an agent. Stable for the whole game.
pub type AgentId = u8;

/// Health every agent starts with.
pub const STARTING_HEALTH: u32 = 100;

/// Resource counters carried by an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stockpile {
    /// Gold collected.
    pub gold: u32,
    /// Food collected.
    pub food: u32,
    /// Weapons collected. Drives combat power.
    pub weapon: u32,
}

impl Stockpile {
    /// The loadout every agent starts with.
    pub const STARTING: Stockpile = Stockpile {
        gold: 0,
        food: 10,
        weapon: 1,
    };

    /// Get the counter for a resource kind.
    #[must_use]
    pub const fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Gold => self.gold,
            Resource::Food => self.food,
            Resource::Weapon => self.weapon,
        }
    }

    /// Increment the counter for a resource kind by one.
    pub fn add(&mut self, resource: Resource) {
        let counter = match resource {
            Resource::Gold => &mut self.gold,
            Resource::Food => &mut self.food,
            Resource::Weapon => &mut self.weapon,
        };
        *counter = counter.saturating_add(1);
    }

    /// Merge every counter of `other` into this stockpile.
    pub fn absorb(&mut self, other: &Stockpile) {
        self.gold = self.gold.saturating_add(other.gold);
        self.food = self.food.saturating_add(other.food);
        self.weapon = self.weapon.saturating_add(other.weapon);
    }
}

/// Who picks an agent's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Moves come from user input.
    Human,
    /// Moves come from the decision procedure.
    Scripted,
}

/// Temperament of a scripted agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Avoids losing fights but never goes looking for one.
    Easy,
    /// Hunts any agent it can out-power.
    #[default]
    Insane,
}

impl Difficulty {
    /// Whether winnable fights add to a candidate's score.
    #[must_use]
    pub const fn seeks_combat(self) -> bool {
        matches!(self, Difficulty::Insane)
    }
}

/// State for a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Agent {
    /// Unique identifier for this agent.
    pub id: AgentId,
    /// Current cell.
    pub position: Coord,
    /// Collected resources.
    pub resources: Stockpile,
    /// Who controls this agent.
    pub control: ControlMode,
    /// Scripted temperament. Ignored for human-controlled agents.
    pub difficulty: Difficulty,
    /// Remaining health. The agent is eliminated at zero.
    pub health: u32,
    /// Experience. Never decreases.
    pub experience: u32,
}

impl Agent {
    /// Create a new agent with the starting loadout.
    #[must_use]
    pub const fn new(id: AgentId, position: Coord, control: ControlMode) -> Self {
        Self {
            id,
            position,
            resources: Stockpile::STARTING,
            control,
            difficulty: Difficulty::Insane,
            health: STARTING_HEALTH,
            experience: 0,
        }
    }

    /// Create a human-controlled agent.
    #[must_use]
    pub const fn human(id: AgentId, position: Coord) -> Self {
        Self::new(id, position, ControlMode::Human)
    }

    /// Create a scripted agent.
    #[must_use]
    pub const fn scripted(id: AgentId, position: Coord) -> Self {
        Self::new(id, position, ControlMode::Scripted)
    }

    /// Check if this agent is scripted.
    #[must_use]
    pub const fn is_scripted(&self) -> bool {
        matches!(self.control, ControlMode::Scripted)
    }

    /// Check if this agent has been beaten down to zero health.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Add experience.
    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }

    /// Take damage, clamping health at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_creation() {
        let agent = Agent::scripted(1, Coord::new(5, 5));
        assert_eq!(agent.id, 1);
        assert_eq!(agent.position, Coord::new(5, 5));
        assert_eq!(agent.resources, Stockpile { gold: 0, food: 10, weapon: 1 });
        assert_eq!(agent.health, 100);
        assert_eq!(agent.experience, 0);
        assert!(agent.is_scripted());
        assert!(!Agent::human(0, Coord::new(0, 0)).is_scripted());
    }

    #[test]
    fn test_stockpile_add_and_get() {
        let mut stock = Stockpile::default();
        stock.add(Resource::Gold);
        stock.add(Resource::Gold);
        stock.add(Resource::Weapon);
        assert_eq!(stock.get(Resource::Gold), 2);
        assert_eq!(stock.get(Resource::Food), 0);
        assert_eq!(stock.get(Resource::Weapon), 1);
    }

    #[test]
    fn test_stockpile_absorb() {
        let mut winner = Stockpile { gold: 1, food: 2, weapon: 3 };
        winner.absorb(&Stockpile { gold: 4, food: 5, weapon: 6 });
        assert_eq!(winner, Stockpile { gold: 5, food: 7, weapon: 9 });
    }

    #[test]
    fn test_take_damage_clamps() {
        let mut agent = Agent::scripted(1, Coord::new(0, 0));
        agent.take_damage(30);
        assert_eq!(agent.health, 70);
        agent.take_damage(500);
        assert_eq!(agent.health, 0);
        assert!(agent.is_defeated());
    }

    #[test]
    fn test_difficulty_combat_appetite() {
        assert!(Difficulty::Insane.seeks_combat());
        assert!(!Difficulty::Easy.seeks_combat());
        assert_eq!(Difficulty::default(), Difficulty::Insane);
    }
}
