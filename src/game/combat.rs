//! Combat resolution.
//!
//! A fight is a single exchange: the mover strikes the occupant of the cell it
//! entered and the occupant never strikes back. Weapons count double on
//! offense, and only half of the defender's experience helps on defense.

use crate::game::Agent;

/// Attack power per weapon.
const WEAPON_ATTACK: u32 = 10;
/// Defense power per weapon.
const WEAPON_DEFENSE: u32 = 5;
/// Experience the attacker gains from every exchange.
pub const COMBAT_EXPERIENCE: u32 = 2;
/// Extra experience for eliminating the defender.
pub const ELIMINATION_BONUS: u32 = 10;

/// Offensive strength of an agent.
#[must_use]
pub const fn attack_power(agent: &Agent) -> u32 {
    agent
        .resources
        .weapon
        .saturating_mul(WEAPON_ATTACK)
        .saturating_add(agent.experience)
}

/// Defensive strength of an agent. Half experience rounds down.
#[must_use]
pub const fn defense_power(agent: &Agent) -> u32 {
    agent
        .resources
        .weapon
        .saturating_mul(WEAPON_DEFENSE)
        .saturating_add(agent.experience / 2)
}

/// Damage dealt by `attacker` to `defender`. Never negative.
#[must_use]
pub const fn damage(attacker: &Agent, defender: &Agent) -> u32 {
    attack_power(attacker).saturating_sub(defense_power(defender))
}

/// Whether `attacker` out-powers `defender`.
#[must_use]
pub const fn is_favorable(attacker: &Agent, defender: &Agent) -> bool {
    attack_power(attacker) > defense_power(defender)
}

/// Outcome of one exchange.
///
/// Carries the updated copies of both agents; nothing is committed until the
/// caller writes them back into the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatResult {
    /// The attacker after the exchange.
    pub attacker: Agent,
    /// The defender after the exchange.
    pub defender: Agent,
    /// Damage dealt.
    pub damage: u32,
    /// Whether the defender dropped to zero health.
    pub defender_eliminated: bool,
}

/// Resolve one exchange between `attacker` and `defender`.
#[must_use]
pub fn resolve_combat(attacker: &Agent, defender: &Agent) -> CombatResult {
    let mut attacker = *attacker;
    let mut defender = *defender;

    let dealt = damage(&attacker, &defender);
    defender.take_damage(dealt);
    attacker.gain_experience(COMBAT_EXPERIENCE);

    let defender_eliminated = defender.is_defeated();
    if defender_eliminated {
        attacker.resources.absorb(&defender.resources);
        attacker.gain_experience(ELIMINATION_BONUS);
    }

    CombatResult {
        attacker,
        defender,
        damage: dealt,
        defender_eliminated,
    }
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;
    use crate::game::{Agent, Coord};

    /// Damage is bounded by attack power, so it never underflows.
    #[kani::proof]
    fn prove_damage_bounded() {
        let mut attacker = Agent::scripted(1, Coord::new(0, 0));
        let mut defender = Agent::scripted(2, Coord::new(0, 0));
        attacker.resources.weapon = kani::any();
        attacker.experience = kani::any();
        defender.resources.weapon = kani::any();
        defender.experience = kani::any();

        let dealt = damage(&attacker, &defender);
        assert!(dealt <= attack_power(&attacker));
    }
}
