//! Data-driven combat content and loaders.
//!
//! This crate turns data files into the oracle snapshots and initial state
//! consumed by `warfare-core`:
//! - Combat rules tables (TOML) into [`warfare_core::CombatConfig`]
//! - Scenarios (RON): map tiles, unit templates, factions, wars, cities,
//!   units and a script of engagements
//!
//! Content is read once at startup and never written back.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ContentFactory, EngagementSpec, LoadResult, RulesLoader, Scenario, ScenarioLoader,
};
