//! Attack validity rules.

use super::errors::{AttackRejection, CombatError};
use crate::combat::CombatType;
use crate::env::{GameEnv, TileInfo};
use crate::state::{CombatFlags, GameState, UnitId, UnitState};

/// The two combatants and the defender's tile, resolved from ids.
pub(crate) struct Engagement<'s> {
    pub attacker: &'s UnitState,
    pub defender: &'s UnitState,
    pub tile: TileInfo,
}

pub(crate) fn resolve<'s>(
    state: &'s GameState,
    env: &GameEnv<'_>,
    attacker: UnitId,
    defender: UnitId,
) -> Result<Engagement<'s>, CombatError> {
    let attacker = state.unit(attacker).ok_or(CombatError::UnitNotFound(attacker))?;
    let defender = state.unit(defender).ok_or(CombatError::UnitNotFound(defender))?;
    let tile = env
        .map()
        .tile(defender.location)
        .ok_or(CombatError::LocationNotOnMap(defender.location))?;
    Ok(Engagement {
        attacker,
        defender,
        tile,
    })
}

/// Runs every rule for `combat_type`, reporting the first that fails.
pub(crate) fn check(
    state: &GameState,
    env: &GameEnv<'_>,
    engagement: &Engagement<'_>,
    combat_type: CombatType,
) -> Result<(), AttackRejection> {
    check_common(state, engagement, combat_type)?;
    match combat_type {
        CombatType::Melee => check_melee(env, engagement),
        CombatType::Ranged => check_ranged(env, engagement),
    }
}

fn check_common(
    state: &GameState,
    engagement: &Engagement<'_>,
    combat_type: CombatType,
) -> Result<(), AttackRejection> {
    let Engagement {
        attacker, defender, ..
    } = engagement;

    if attacker.id == defender.id {
        return Err(AttackRejection::SameUnit);
    }
    if attacker.owner == defender.owner {
        return Err(AttackRejection::SameOwner(attacker.owner));
    }
    if !state.diplomacy.are_at_war(attacker.owner, defender.owner) {
        return Err(AttackRejection::NotAtWar {
            attacker: attacker.owner,
            defender: defender.owner,
        });
    }
    if !attacker.has_movement_left() {
        return Err(AttackRejection::NoMovementLeft);
    }
    if !attacker.can_attack {
        return Err(AttackRejection::CannotAttack);
    }
    let strength = match combat_type {
        CombatType::Melee => attacker.melee_strength,
        CombatType::Ranged => attacker.ranged_strength,
    };
    if strength == 0 {
        return Err(AttackRejection::NoStrength(combat_type));
    }
    Ok(())
}

fn check_melee(env: &GameEnv<'_>, engagement: &Engagement<'_>) -> Result<(), AttackRejection> {
    let Engagement {
        attacker,
        defender,
        tile,
    } = engagement;
    let target = defender.location;

    let distance = env.map().distance(attacker.location, target);
    if distance > 1 {
        return Err(AttackRejection::OutOfRange { distance, reach: 1 });
    }
    if tile.is_mountain() {
        return Err(AttackRejection::TargetOnMountain);
    }
    if !env.map().can_occupy(attacker, target) {
        return Err(AttackRejection::CannotOccupyTarget(target));
    }
    if !env.visibility().is_visible(attacker, target) {
        return Err(AttackRejection::TargetNotVisible(target));
    }
    Ok(())
}

fn check_ranged(env: &GameEnv<'_>, engagement: &Engagement<'_>) -> Result<(), AttackRejection> {
    let Engagement {
        attacker, defender, ..
    } = engagement;
    let target = defender.location;

    let distance = env.map().distance(attacker.location, target);
    if distance > attacker.attack_range {
        return Err(AttackRejection::OutOfRange {
            distance,
            reach: attacker.attack_range,
        });
    }
    if !attacker.ready_for_ranged_attack {
        return Err(AttackRejection::NotReadyForRangedAttack);
    }
    let sees_through = attacker.summary.has(CombatFlags::IGNORES_LINE_OF_SIGHT);
    if !sees_through && !env.visibility().is_visible(attacker, target) {
        return Err(AttackRejection::TargetNotVisible(target));
    }
    Ok(())
}
