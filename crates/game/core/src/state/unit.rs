use bitflags::bitflags;

use super::{FactionId, HexCoord, ResourceMeter, TemplateId, UnitId};
use crate::combat::ConditionalModifier;

/// Broad unit category used by conditions, placement rules and responders.
///
/// `City` marks the combat facade a city fights through; it never moves and
/// is defeated by conquest rather than destruction.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitType {
    #[default]
    Infantry,
    Archery,
    Mounted,
    Siege,
    Naval,
    Civilian,
    City,
}

impl UnitType {
    pub fn is_city(self) -> bool {
        matches!(self, UnitType::City)
    }

    pub fn is_naval(self) -> bool {
        matches!(self, UnitType::Naval)
    }
}

bitflags! {
    /// Promotion-provided capability flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatFlags: u8 {
        const CAN_MOVE_AFTER_ATTACKING   = 1 << 0;
        const CAN_ATTACK_AFTER_ATTACKING = 1 << 1;
        const IGNORES_AMPHIBIOUS_PENALTY = 1 << 2;
        const IGNORES_DEFENSIVE_TERRAIN  = 1 << 3;
        const IGNORES_LINE_OF_SIGHT      = 1 << 4;
    }
}

/// Per-unit bundle of promotion-derived flags and conditional modifiers.
///
/// Aura lists are applied to *other* friendly units fighting nearby, never to
/// the unit that carries them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatSummary {
    pub flags: CombatFlags,
    pub when_attacking: Vec<ConditionalModifier>,
    pub when_defending: Vec<ConditionalModifier>,
    pub aura_when_attacking: Vec<ConditionalModifier>,
    pub aura_when_defending: Vec<ConditionalModifier>,
}

impl CombatSummary {
    pub fn has(&self, flag: CombatFlags) -> bool {
        self.flags.contains(flag)
    }
}

/// A combatant on the map: a regular unit or the facade of a city.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub template: TemplateId,
    pub unit_type: UnitType,
    pub owner: FactionId,
    pub location: HexCoord,
    pub hitpoints: ResourceMeter,
    pub melee_strength: u32,
    pub ranged_strength: u32,
    pub attack_range: u32,
    pub movement: ResourceMeter,
    pub can_attack: bool,
    pub ready_for_ranged_attack: bool,
    /// Consecutive turns spent fortified; zero when not fortified.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fortified_turns: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub summary: CombatSummary,
}

impl UnitState {
    pub const DEFAULT_HITPOINTS: u32 = 100;
    pub const DEFAULT_MOVEMENT: u32 = 2;

    /// Creates a healthy, rested unit with no strength assigned yet.
    pub fn new(
        id: UnitId,
        template: TemplateId,
        unit_type: UnitType,
        owner: FactionId,
        location: HexCoord,
    ) -> Self {
        Self {
            id,
            template,
            unit_type,
            owner,
            location,
            hitpoints: ResourceMeter::full(Self::DEFAULT_HITPOINTS),
            melee_strength: 0,
            ranged_strength: 0,
            attack_range: 1,
            movement: ResourceMeter::full(Self::DEFAULT_MOVEMENT),
            can_attack: true,
            ready_for_ranged_attack: false,
            fortified_turns: 0,
            summary: CombatSummary::default(),
        }
    }

    #[must_use]
    pub fn with_melee(mut self, strength: u32) -> Self {
        self.melee_strength = strength;
        self
    }

    /// Gives the unit a ranged attack and marks it ready to fire.
    #[must_use]
    pub fn with_ranged(mut self, strength: u32, range: u32) -> Self {
        self.ranged_strength = strength;
        self.attack_range = range;
        self.ready_for_ranged_attack = true;
        self
    }

    #[must_use]
    pub fn with_hitpoints(mut self, current: u32, maximum: u32) -> Self {
        self.hitpoints = ResourceMeter::new(current, maximum);
        self
    }

    #[must_use]
    pub fn with_movement(mut self, current: u32, maximum: u32) -> Self {
        self.movement = ResourceMeter::new(current, maximum);
        self
    }

    #[must_use]
    pub fn with_fortification(mut self, turns: u32) -> Self {
        self.fortified_turns = turns;
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: CombatSummary) -> Self {
        self.summary = summary;
        self
    }

    pub fn is_city(&self) -> bool {
        self.unit_type.is_city()
    }

    pub fn is_wounded(&self) -> bool {
        self.hitpoints.current < self.hitpoints.maximum
    }

    pub fn is_alive(&self) -> bool {
        !self.hitpoints.is_depleted()
    }

    pub fn has_movement_left(&self) -> bool {
        !self.movement.is_depleted()
    }
}
