//! Content factory for loading rules and scenarios from a data directory.

use std::path::{Path, PathBuf};

use warfare_core::CombatConfig;

use crate::loaders::{LoadResult, RulesLoader, Scenario, ScenarioLoader};

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml
/// └── scenarios/
///     ├── river_ford.ron
///     └── barbarian_raid.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data directory bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load combat rules from `rules.toml`.
    pub fn load_rules(&self) -> LoadResult<CombatConfig> {
        RulesLoader::load(&self.data_dir.join("rules.toml"))
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self
            .data_dir
            .join("scenarios")
            .join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warfare_core::{CombatType, FactionId, TablesOracle, UnitId};

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_rules_load() {
        let rules = ContentFactory::bundled().load_rules().unwrap();
        assert_eq!(rules.base_damage(), 30.0);
        assert!(rules.sack_enabled());
    }

    #[test]
    fn bundled_scenarios_load() {
        let factory = ContentFactory::bundled();

        let ford = factory.load_scenario("river_ford").unwrap();
        assert!(!ford.engagements.is_empty());
        assert!(ford.state.diplomacy.are_at_war(FactionId(1), FactionId(2)));

        let raid = factory.load_scenario("barbarian_raid").unwrap();
        assert!(raid.state.factions.values().any(|f| f.barbaric));
        assert!(raid.engagements.iter().any(|e| e.combat == CombatType::Ranged));
        assert!(raid.state.unit(UnitId(1)).is_some());
    }

    #[test]
    fn missing_scenario_is_an_error() {
        assert!(ContentFactory::bundled().load_scenario("nowhere").is_err());
    }
}
