//! Post-combat responders that apply the consequences of damage.
//!
//! Responders run after hitpoints are committed. Each one decides from a
//! read-only view whether it applies, then mutates state and records what
//! it did. Triggers read the post-damage snapshot taken before the first
//! responder ran, so one responder's edits (a city clamped back to 1 HP, a
//! captured unit changing hands) never hide another responder's trigger.

use std::sync::Arc;

use super::responders::{
    CityConquestResponder, CitySackResponder, DestructionResponder, ForcedMovementResponder,
    PlunderResponder,
};
use crate::combat::{CombatEvent, CombatInfo, MoveRequest, UnitCombatResults};
use crate::env::GameEnv;
use crate::state::{CityId, FactionId, GameState, HexCoord, TemplateId, UnitId, UnitState, UnitType};

/// A combatant as it stood right after damage was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatantSnapshot {
    pub id: UnitId,
    pub owner: FactionId,
    pub template: TemplateId,
    pub unit_type: UnitType,
    pub location: HexCoord,
    pub hitpoints: u32,
    /// City this unit is the facade of.
    pub city: Option<CityId>,
}

impl CombatantSnapshot {
    pub(crate) fn capture(state: &GameState, unit: &UnitState) -> Self {
        Self {
            id: unit.id,
            owner: unit.owner,
            template: unit.template,
            unit_type: unit.unit_type,
            location: unit.location,
            hitpoints: unit.hitpoints.current,
            city: state.city_by_facade(unit.id).map(|city| city.id),
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hitpoints == 0
    }

    pub fn is_city(&self) -> bool {
        self.unit_type.is_city()
    }
}

/// Read-only inputs shared by every responder for one attack.
pub struct ResponderContext<'a> {
    pub env: GameEnv<'a>,
    pub info: &'a CombatInfo,
    pub results: &'a UnitCombatResults,
    pub attacker: CombatantSnapshot,
    pub defender: CombatantSnapshot,
}

impl ResponderContext<'_> {
    pub fn is_melee(&self) -> bool {
        self.info.combat_type.is_melee()
    }
}

/// Accumulates what the responders did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aftermath {
    pub events: Vec<CombatEvent>,
    pub deferred_move: Option<MoveRequest>,
}

impl Aftermath {
    pub fn record(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Keeps the first move request; later ones target the same cell or are moot.
    pub fn request_move(&mut self, request: MoveRequest) {
        if self.deferred_move.is_none() {
            self.deferred_move = Some(request);
        }
    }
}

/// A post-combat consequence.
///
/// `applies` must be side-effect free; `respond` is only called when it
/// returned true.
pub trait PostCombatResponder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower values run first. Default priority is 0.
    fn priority(&self) -> i32 {
        0
    }

    fn applies(&self, ctx: &ResponderContext<'_>, state: &GameState) -> bool;

    fn respond(&self, ctx: &ResponderContext<'_>, state: &mut GameState, aftermath: &mut Aftermath);
}

/// Fixed, priority-ordered list of responders.
#[derive(Clone)]
pub struct ResponderChain {
    responders: Arc<[Arc<dyn PostCombatResponder>]>,
}

impl ResponderChain {
    pub fn new(mut responders: Vec<Arc<dyn PostCombatResponder>>) -> Self {
        // Stable sort keeps insertion order among equal priorities.
        responders.sort_by_key(|r| r.priority());
        Self {
            responders: responders.into(),
        }
    }

    /// Destruction → sack → plunder → conquest → forced movement.
    pub fn standard() -> Self {
        Self::new(vec![
            Arc::new(DestructionResponder),
            Arc::new(CitySackResponder),
            Arc::new(PlunderResponder),
            Arc::new(CityConquestResponder),
            Arc::new(ForcedMovementResponder),
        ])
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.responders.iter().map(|r| r.name())
    }

    pub(crate) fn run(
        &self,
        ctx: &ResponderContext<'_>,
        state: &mut GameState,
        aftermath: &mut Aftermath,
    ) {
        for responder in self.responders.iter() {
            if responder.applies(ctx, state) {
                responder.respond(ctx, state, aftermath);
            }
        }
    }
}

impl Default for ResponderChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ResponderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
