//! Hitpoint damage from effective strengths.

use super::{CombatInfo, CombatType};
use crate::state::UnitState;

/// Damage each side takes from one exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageDealt {
    pub to_attacker: u32,
    pub to_defender: u32,
}

/// Effective `(attacker, defender)` strengths after modifiers.
///
/// The attacker uses the strength matching the combat type; the defender
/// always answers with melee strength. Modifiers below -100% floor at zero.
pub fn effective_strengths(
    attacker: &UnitState,
    defender: &UnitState,
    info: &CombatInfo,
) -> (f64, f64) {
    let base = match info.combat_type {
        CombatType::Melee => attacker.melee_strength,
        CombatType::Ranged => attacker.ranged_strength,
    };
    let attacker_effective = f64::from(base) * (1.0 + info.attacker_modifier);
    let defender_effective = f64::from(defender.melee_strength) * (1.0 + info.defender_modifier);
    (attacker_effective.max(0.0), defender_effective.max(0.0))
}

/// Computes the damage pair for one attack.
///
/// # Formula
///
/// ```text
/// to_defender = round(attacker_eff / defender_eff * base_damage)
/// to_attacker = round(defender_eff / attacker_eff * base_damage)   (melee only)
/// ```
///
/// A side with zero effective strength takes lethal damage and deals none.
/// Both values are clamped to the receiver's current hitpoints.
pub fn calculate_damage(
    attacker: &UnitState,
    defender: &UnitState,
    info: &CombatInfo,
    base_damage: f64,
) -> DamageDealt {
    let (attacker_effective, defender_effective) = effective_strengths(attacker, defender, info);
    let attacker_hp = attacker.hitpoints.current;
    let defender_hp = defender.hitpoints.current;

    let (raw_to_attacker, raw_to_defender) = if attacker_effective == 0.0 {
        (attacker_hp, 0)
    } else if defender_effective == 0.0 {
        (0, defender_hp)
    } else {
        let to_defender = (attacker_effective / defender_effective * base_damage).round();
        let to_attacker = (defender_effective / attacker_effective * base_damage).round();
        // `as` saturates, so absurd ratios still land inside u32.
        (to_attacker as u32, to_defender as u32)
    };

    let to_attacker = match info.combat_type {
        CombatType::Melee => raw_to_attacker.min(attacker_hp),
        CombatType::Ranged => 0,
    };
    DamageDealt {
        to_attacker,
        to_defender: raw_to_defender.min(defender_hp),
    }
}
