use crate::combat::{CombatEvent, MoveRequest};
use crate::engine::responder::{
    Aftermath, CombatantSnapshot, PostCombatResponder, ResponderContext,
};
use crate::state::{FactionId, GameState, ResourceMeter};

/// Removes defeated units, captures eligible ones, and keeps cities at 1 HP.
///
/// A melee attacker that survives and clears the defender's cell is queued
/// to advance into it. Other factions' units left stacked on the cell keep
/// it occupied.
#[derive(Debug)]
pub struct DestructionResponder;

impl PostCombatResponder for DestructionResponder {
    fn name(&self) -> &'static str {
        "destruction"
    }

    fn priority(&self) -> i32 {
        -20
    }

    fn applies(&self, ctx: &ResponderContext<'_>, _state: &GameState) -> bool {
        ctx.attacker.is_defeated() || ctx.defender.is_defeated()
    }

    fn respond(&self, ctx: &ResponderContext<'_>, state: &mut GameState, aftermath: &mut Aftermath) {
        if ctx.attacker.is_defeated() {
            defeat(&ctx.attacker, state, aftermath);
        }

        if !ctx.defender.is_defeated() {
            return;
        }
        if ctx.defender.is_city() {
            clamp_city(&ctx.defender, state);
            return;
        }
        if !capture(ctx, state, aftermath) {
            defeat(&ctx.defender, state, aftermath);
        }
        if ctx.is_melee()
            && !ctx.attacker.is_defeated()
            && is_vacated(state, &ctx.defender, ctx.attacker.owner)
        {
            aftermath.request_move(MoveRequest {
                unit: ctx.attacker.id,
                from: ctx.attacker.location,
                to: ctx.defender.location,
                ignore_movement_cost: true,
            });
        }
    }
}

fn defeat(unit: &CombatantSnapshot, state: &mut GameState, aftermath: &mut Aftermath) {
    if unit.is_city() {
        clamp_city(unit, state);
        return;
    }
    if state.remove_unit(unit.id).is_some() {
        aftermath.record(CombatEvent::UnitDestroyed {
            unit: unit.id,
            owner: unit.owner,
            template: unit.template,
        });
    }
}

fn is_vacated(state: &GameState, defender: &CombatantSnapshot, victor: FactionId) -> bool {
    state
        .units_at(defender.location)
        .all(|unit| unit.owner == victor)
}

/// Cities fall to conquest, never to damage.
fn clamp_city(city: &CombatantSnapshot, state: &mut GameState) {
    if let Some(facade) = state.unit_mut(city.id) {
        facade.hitpoints.current = facade.hitpoints.current.max(1);
    }
}

/// Hands a defeated capturable defender to the attacker's faction.
///
/// The captured unit is placed on the attacker's origin cell with no
/// movement and no attack left, so the victor can still advance.
fn capture(ctx: &ResponderContext<'_>, state: &mut GameState, aftermath: &mut Aftermath) -> bool {
    if !ctx.is_melee() || ctx.attacker.is_defeated() {
        return false;
    }
    let tables = ctx.env.tables();
    if !tables.is_capturable(ctx.defender.template) {
        return false;
    }
    let permitted = match (state.unit(ctx.defender.id), state.faction(ctx.attacker.owner)) {
        (Some(unit), Some(faction)) => ctx.env.ownership().can_change_owner(unit, faction),
        _ => false,
    };
    if !permitted {
        return false;
    }
    let Some(unit) = state.unit_mut(ctx.defender.id) else {
        return false;
    };

    let maximum = unit.hitpoints.maximum;
    let restored = (f64::from(maximum) * tables.captured_health_fraction()).floor() as u32;
    unit.owner = ctx.attacker.owner;
    unit.location = ctx.attacker.location;
    unit.hitpoints = ResourceMeter::new(restored.clamp(1, maximum.max(1)), maximum);
    unit.movement.current = 0;
    unit.can_attack = false;
    unit.fortified_turns = 0;

    aftermath.record(CombatEvent::UnitCaptured {
        unit: ctx.defender.id,
        from: ctx.defender.owner,
        to: ctx.attacker.owner,
    });
    true
}
