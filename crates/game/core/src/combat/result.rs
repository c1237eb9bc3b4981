//! Reports and follow-up requests produced by a resolved attack.

use super::CombatInfo;
use crate::state::{CityId, FactionId, HexCoord, TemplateId, UnitId};

/// Report of one resolved attack for external observers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitCombatResults {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub damage_to_attacker: u32,
    pub damage_to_defender: u32,
    pub info: CombatInfo,
}

/// State change performed by a post-combat responder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    UnitDestroyed {
        unit: UnitId,
        owner: FactionId,
        template: TemplateId,
    },
    UnitCaptured {
        unit: UnitId,
        from: FactionId,
        to: FactionId,
    },
    CityCaptured {
        city: CityId,
        from: FactionId,
        to: FactionId,
    },
    CitySacked {
        city: CityId,
        from: FactionId,
        to: FactionId,
        gold: u32,
    },
    GoldRaided {
        from: FactionId,
        to: FactionId,
        gold: u32,
    },
    BountyAwarded {
        faction: FactionId,
        victim: UnitId,
        gold: u32,
    },
}

/// Deferred one-step relocation of a victorious attacker.
///
/// Issued only after every combat effect is committed; completing or
/// dropping it never affects combat results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRequest {
    pub unit: UnitId,
    pub from: HexCoord,
    pub to: HexCoord,
    pub ignore_movement_cost: bool,
}

/// Everything a resolved attack produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub results: UnitCombatResults,
    pub events: Vec<CombatEvent>,
    pub deferred_move: Option<MoveRequest>,
}

impl CombatOutcome {
    pub fn destroyed(&self, unit: UnitId) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, CombatEvent::UnitDestroyed { unit: u, .. } if *u == unit))
    }

    pub fn captured(&self, unit: UnitId) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, CombatEvent::UnitCaptured { unit: u, .. } if *u == unit))
    }
}
