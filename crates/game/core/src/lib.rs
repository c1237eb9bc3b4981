//! Deterministic combat rules for a hex-grid strategy game.
//!
//! `warfare-core` resolves melee and ranged attacks between units and cities.
//! It validates an attack, derives the modifier breakdown ([`CombatInfo`]),
//! turns effective strengths into hitpoint damage and then runs a chain of
//! post-combat responders (destruction, capture, sacking, plunder, conquest,
//! movement). All world knowledge the rules need beyond [`GameState`] is
//! read through the oracle traits bundled in [`Env`].
//!
//! All state mutation flows through [`CombatEngine`]. The crate performs no
//! I/O and no logging; the runtime crate wraps it with both.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use combat::{
    CombatCondition, CombatEvent, CombatInfo, CombatOutcome, CombatType, ConditionJoin,
    ConditionalModifier, DamageDealt, LocationCriterion, ModifierEntry, ModifierSource,
    MoveRequest, Restriction, Side, UnitCombatResults, UnitCriterion, build_attack_info,
    calculate_damage,
};
pub use config::CombatConfig;
pub use engine::{
    Aftermath, AttackRejection, CombatEngine, CombatError, CombatPreview, CombatantSnapshot,
    PostCombatResponder, ResponderChain, ResponderContext,
};
pub use env::{
    Env, GameEnv, ImprovementKind, MapOracle, MapSnapshot, OwnershipOracle, OwnershipRules,
    ShapeKind, SightRangeVisibility, TablesOracle, TemplateOracle, TemplatesSnapshot, TerrainKind,
    TileInfo, UnitTemplate, VegetationKind, VisibilityOracle,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    CityId, CityState, CombatFlags, CombatSummary, DiplomacyState, FactionId, FactionState,
    GameState, HexCoord, MoveFailure, ResourceMeter, TemplateId, UnitId, UnitState, UnitType,
};
