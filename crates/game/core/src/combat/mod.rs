//! Combat resolution system.
//!
//! This module holds the pure half of combat: condition evaluation,
//! conditional modifiers, the [`CombatInfo`] builder and the damage
//! calculator. Nothing here mutates [`crate::state::GameState`]; the engine
//! applies results.
//!
//! # Pipeline
//!
//! ```text
//! build_attack_info (modifier contributions) → calculate_damage → engine applies
//! ```

pub mod condition;
pub mod damage;
pub mod info;
pub mod modifier;
pub mod result;

pub use condition::{
    CombatCondition, ConditionContext, LocationCriterion, Restriction, UnitCriterion,
    is_condition_met,
};
pub use damage::{DamageDealt, calculate_damage, effective_strengths};
pub use info::{CombatInfo, ModifierEntry, ModifierSource, Side, build_attack_info};
pub use modifier::{ConditionJoin, ConditionalModifier};
pub use result::{CombatEvent, CombatOutcome, MoveRequest, UnitCombatResults};

/// How an attack is delivered.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum CombatType {
    Melee,
    Ranged,
}

impl CombatType {
    pub fn is_melee(self) -> bool {
        matches!(self, CombatType::Melee)
    }
}
