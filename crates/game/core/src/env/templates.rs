//! Unit template definitions and oracle interface.
//!
//! A template is the archetype a unit is built from: its base strengths,
//! hitpoints, movement and production cost. Scenarios spawn units from
//! templates, and the bounty rules read the production cost back.

use crate::state::{
    CombatSummary, FactionId, HexCoord, ResourceMeter, TemplateId, UnitId, UnitState, UnitType,
};

/// Catalog of unit templates keyed by [`TemplateId`].
pub trait TemplateOracle: Send + Sync {
    fn template(&self, id: TemplateId) -> Option<UnitTemplate>;

    fn production_cost(&self, id: TemplateId) -> Option<u32> {
        self.template(id).map(|t| t.production_cost)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub name: String,
    pub unit_type: UnitType,
    pub production_cost: u32,
    pub hitpoints: u32,
    pub movement: u32,
    pub melee_strength: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ranged_strength: u32,
    #[cfg_attr(feature = "serde", serde(default = "UnitTemplate::default_range"))]
    pub attack_range: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub summary: CombatSummary,
}

impl UnitTemplate {
    #[cfg(feature = "serde")]
    fn default_range() -> u32 {
        1
    }

    pub fn new(name: impl Into<String>, unit_type: UnitType, production_cost: u32) -> Self {
        Self {
            name: name.into(),
            unit_type,
            production_cost,
            hitpoints: UnitState::DEFAULT_HITPOINTS,
            movement: UnitState::DEFAULT_MOVEMENT,
            melee_strength: 0,
            ranged_strength: 0,
            attack_range: 1,
            summary: CombatSummary::default(),
        }
    }

    /// Builds a fresh unit of this template.
    pub fn spawn(
        &self,
        template: TemplateId,
        id: UnitId,
        owner: FactionId,
        location: HexCoord,
    ) -> UnitState {
        UnitState {
            id,
            template,
            unit_type: self.unit_type,
            owner,
            location,
            hitpoints: ResourceMeter::full(self.hitpoints),
            melee_strength: self.melee_strength,
            ranged_strength: self.ranged_strength,
            attack_range: self.attack_range,
            movement: ResourceMeter::full(self.movement),
            can_attack: true,
            ready_for_ranged_attack: self.ranged_strength > 0,
            fortified_turns: 0,
            summary: self.summary.clone(),
        }
    }
}
