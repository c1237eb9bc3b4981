//! Runtime ownership of the read-only combat collaborators.
//!
//! The map, balance tables, templates, visibility and ownership rules never
//! change while a battle runs, so they are shared behind `Arc` and bundled
//! into a [`warfare_core::GameEnv`] whenever the simulation worker needs one.
use std::sync::Arc;

use warfare_content::Scenario;
use warfare_core::{
    CombatConfig, Env, GameEnv, MapSnapshot, OwnershipRules, SightRangeVisibility,
    TemplatesSnapshot,
};

/// Manages all oracle implementations and provides unified access.
#[derive(Clone, Debug)]
pub struct OracleManager {
    pub(crate) map: Arc<MapSnapshot>,
    pub(crate) tables: Arc<CombatConfig>,
    pub(crate) templates: Arc<TemplatesSnapshot>,
    pub(crate) visibility: Arc<SightRangeVisibility>,
    pub(crate) ownership: Arc<OwnershipRules>,
}

impl OracleManager {
    pub fn new(
        map: Arc<MapSnapshot>,
        tables: Arc<CombatConfig>,
        templates: Arc<TemplatesSnapshot>,
        visibility: Arc<SightRangeVisibility>,
        ownership: Arc<OwnershipRules>,
    ) -> Self {
        Self {
            map,
            tables,
            templates,
            visibility,
            ownership,
        }
    }

    /// Builds the oracle set for a loaded scenario under the given rules.
    ///
    /// Visibility and capture permissions use their defaults.
    pub fn from_scenario(scenario: &Scenario, rules: CombatConfig) -> Self {
        Self::new(
            Arc::new(scenario.map.clone()),
            Arc::new(rules),
            Arc::new(scenario.templates.clone()),
            Arc::new(SightRangeVisibility::default()),
            Arc::new(OwnershipRules::default()),
        )
    }

    pub fn with_visibility(mut self, visibility: SightRangeVisibility) -> Self {
        self.visibility = Arc::new(visibility);
        self
    }

    pub fn with_ownership(mut self, ownership: OwnershipRules) -> Self {
        self.ownership = Arc::new(ownership);
        self
    }

    /// Converts the manager into the environment the combat engine reads.
    pub fn as_game_env(&self) -> GameEnv<'_> {
        Env::new(
            self.map.as_ref(),
            self.tables.as_ref(),
            self.templates.as_ref(),
            self.visibility.as_ref(),
            self.ownership.as_ref(),
        )
        .into_game_env()
    }

    pub fn tables(&self) -> &CombatConfig {
        &self.tables
    }
}
