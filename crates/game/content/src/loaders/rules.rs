//! Combat rules loader.
//!
//! Every key is optional; anything left out keeps the value from
//! [`CombatConfig::default`]. Terrain-like tables are keyed by snake_case
//! names, while faction and template tables are arrays because TOML keys
//! cannot be numeric identifiers.
//!
//! ```toml
//! base_damage = 30.0
//! capturable_templates = [4]
//!
//! [defense.shape]
//! hills = 0.25
//!
//! [[bounty_modifiers]]
//! faction = 3
//! modifier = 2.0
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use warfare_core::{CombatConfig, FactionId, TemplateId};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RulesToml {
    base_damage: Option<f64>,
    river_crossing_penalty: Option<f64>,
    aura_range: Option<u32>,
    raid_fraction: Option<f64>,
    sack_enabled: Option<bool>,
    bounty_fraction: Option<f64>,
    captured_health_fraction: Option<f64>,
    capturable_templates: Option<Vec<u32>>,
    defense: DefenseToml,
    fortification: FortificationToml,
    happiness: HappinessToml,
    garrison: GarrisonToml,
    bounty_modifiers: Vec<BountyModifierToml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DefenseToml {
    terrain: Option<BTreeMap<String, f64>>,
    shape: Option<BTreeMap<String, f64>>,
    vegetation: Option<BTreeMap<String, f64>>,
    improvement: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FortificationToml {
    per_turn: Option<f64>,
    cap: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HappinessToml {
    loss_per_unhappiness: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GarrisonToml {
    default_ranged_bonus: Option<f64>,
    by_template: Vec<GarrisonBonusToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GarrisonBonusToml {
    template: u32,
    bonus: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BountyModifierToml {
    faction: u32,
    modifier: f64,
}

/// Loader for combat rules from TOML files.
pub struct RulesLoader;

impl RulesLoader {
    /// Load combat rules from a TOML file.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid rules file {}: {}", path.display(), e))
    }

    /// Parse combat rules from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let raw: RulesToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules TOML: {}", e))?;
        raw.into_config()
    }
}

impl RulesToml {
    fn into_config(self) -> LoadResult<CombatConfig> {
        let mut config = CombatConfig::default();

        if let Some(value) = self.base_damage {
            if value <= 0.0 {
                anyhow::bail!("base_damage must be positive, got {}", value);
            }
            config.base_damage = value;
        }
        if let Some(value) = self.river_crossing_penalty {
            config.river_crossing_penalty = value;
        }
        if let Some(value) = self.aura_range {
            config.aura_range = value;
        }
        if let Some(value) = self.raid_fraction {
            config.raid_fraction = fraction("raid_fraction", value)?;
        }
        if let Some(value) = self.sack_enabled {
            config.sack_enabled = value;
        }
        if let Some(value) = self.bounty_fraction {
            config.bounty_fraction = value;
        }
        if let Some(value) = self.captured_health_fraction {
            config.captured_health_fraction = fraction("captured_health_fraction", value)?;
        }
        if let Some(templates) = self.capturable_templates {
            config.capturable_templates = templates.into_iter().map(TemplateId).collect();
        }

        if let Some(table) = self.defense.terrain {
            config.terrain_defense = keyed("defense.terrain", table)?;
        }
        if let Some(table) = self.defense.shape {
            config.shape_defense = keyed("defense.shape", table)?;
        }
        if let Some(table) = self.defense.vegetation {
            config.vegetation_defense = keyed("defense.vegetation", table)?;
        }
        if let Some(table) = self.defense.improvement {
            config.improvement_defense = keyed("defense.improvement", table)?;
        }

        if let Some(value) = self.fortification.per_turn {
            config.fortification_per_turn = value;
        }
        if let Some(value) = self.fortification.cap {
            config.fortification_cap = value;
        }
        if let Some(value) = self.happiness.loss_per_unhappiness {
            config.loss_per_unhappiness = value;
        }

        if let Some(value) = self.garrison.default_ranged_bonus {
            config.default_garrison_ranged_bonus = value;
        }
        for entry in self.garrison.by_template {
            config
                .garrison_ranged_bonus
                .insert(TemplateId(entry.template), entry.bonus);
        }
        for entry in self.bounty_modifiers {
            config
                .bounty_modifiers
                .insert(FactionId(entry.faction), entry.modifier);
        }

        Ok(config)
    }
}

fn fraction(name: &str, value: f64) -> LoadResult<f64> {
    if !(0.0..=1.0).contains(&value) {
        anyhow::bail!("{} must be within [0, 1], got {}", name, value);
    }
    Ok(value)
}

fn keyed<K>(section: &str, table: BTreeMap<String, f64>) -> LoadResult<BTreeMap<K, f64>>
where
    K: FromStr + Ord,
{
    table
        .into_iter()
        .map(|(name, value)| {
            K::from_str(&name)
                .map(|key| (key, value))
                .map_err(|_| anyhow::anyhow!("Unknown key '{}' in [{}]", name, section))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use warfare_core::{ImprovementKind, ShapeKind, TablesOracle, TerrainKind, VegetationKind};

    #[test]
    fn empty_file_keeps_defaults() {
        let config = RulesLoader::parse("").unwrap();
        assert_eq!(config, CombatConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = RulesLoader::parse(
            r#"
            base_damage = 24.0
            sack_enabled = false
            capturable_templates = [4, 7]

            [defense.terrain]
            desert = -0.1

            [defense.shape]
            Hills = 0.5

            [defense.vegetation]
            forest = 0.3

            [defense.improvement]
            citadel = 1.5

            [fortification]
            per_turn = 0.25
            cap = 0.5

            [[garrison.by_template]]
            template = 2
            bonus = 0.4

            [[bounty_modifiers]]
            faction = 3
            modifier = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.base_damage, 24.0);
        assert!(!config.sack_enabled);
        assert!(config.is_capturable(TemplateId(7)));
        assert_eq!(config.terrain_defense.get(&TerrainKind::Desert), Some(&-0.1));
        assert_eq!(config.shape_defense.get(&ShapeKind::Hills), Some(&0.5));
        assert_eq!(
            config.vegetation_defense.get(&VegetationKind::Forest),
            Some(&0.3)
        );
        // A replaced table drops the defaults it did not mention.
        assert_eq!(config.vegetation_defense.get(&VegetationKind::Marsh), None);
        assert_eq!(config.improvement_defense(ImprovementKind::Citadel), 1.5);
        assert_eq!(config.fortification_bonus(3), 0.5);
        assert_eq!(config.garrison_ranged_bonus(TemplateId(2)), 0.4);
        assert_eq!(
            config.garrison_ranged_bonus(TemplateId(9)),
            CombatConfig::DEFAULT_GARRISON_RANGED_BONUS
        );
        assert_eq!(config.bounty_modifier(FactionId(3)), 2.0);
        assert_eq!(config.bounty_modifier(FactionId(1)), 1.0);
    }

    #[test]
    fn unknown_terrain_is_rejected() {
        let err = RulesLoader::parse("[defense.terrain]\nlava = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("lava"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(RulesLoader::parse("base_dmg = 3.0\n").is_err());
    }

    #[test]
    fn fractions_are_range_checked() {
        assert!(RulesLoader::parse("raid_fraction = 1.5\n").is_err());
        assert!(RulesLoader::parse("base_damage = 0.0\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "aura_range = 3").unwrap();

        let config = RulesLoader::load(file.path()).unwrap();
        assert_eq!(config.aura_range, 3);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RulesLoader::load(Path::new("/nonexistent/rules.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rules.toml"));
    }
}
