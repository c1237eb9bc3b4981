use std::collections::{BTreeMap, BTreeSet};

use crate::env::{ImprovementKind, ShapeKind, TablesOracle, TerrainKind, TileInfo, VegetationKind};
use crate::state::{FactionId, TemplateId};

/// Combat balance constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub base_damage: f64,
    pub terrain_defense: BTreeMap<TerrainKind, f64>,
    pub shape_defense: BTreeMap<ShapeKind, f64>,
    pub vegetation_defense: BTreeMap<VegetationKind, f64>,
    pub improvement_defense: BTreeMap<ImprovementKind, f64>,
    pub river_crossing_penalty: f64,
    /// Radius, in cells, within which friendly auras reach a combatant.
    pub aura_range: u32,
    pub fortification_per_turn: f64,
    pub fortification_cap: f64,
    pub loss_per_unhappiness: f64,
    pub raid_fraction: f64,
    /// Whether barbaric conquerors sack defeated cities.
    pub sack_enabled: bool,
    pub bounty_fraction: f64,
    /// Per-faction bounty multipliers; factions not listed use 1.0.
    pub bounty_modifiers: BTreeMap<FactionId, f64>,
    pub capturable_templates: BTreeSet<TemplateId>,
    pub garrison_ranged_bonus: BTreeMap<TemplateId, f64>,
    pub default_garrison_ranged_bonus: f64,
    pub captured_health_fraction: f64,
}

impl CombatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_DAMAGE: f64 = 30.0;
    pub const DEFAULT_RIVER_CROSSING_PENALTY: f64 = 0.2;
    pub const DEFAULT_AURA_RANGE: u32 = 2;
    pub const DEFAULT_FORTIFICATION_PER_TURN: f64 = 0.2;
    pub const DEFAULT_FORTIFICATION_CAP: f64 = 0.4;
    pub const DEFAULT_LOSS_PER_UNHAPPINESS: f64 = 0.02;
    pub const DEFAULT_RAID_FRACTION: f64 = 0.5;
    pub const DEFAULT_BOUNTY_FRACTION: f64 = 0.1;
    pub const DEFAULT_GARRISON_RANGED_BONUS: f64 = 0.25;
    pub const DEFAULT_CAPTURED_HEALTH_FRACTION: f64 = 0.5;

    pub fn new() -> Self {
        let terrain_defense = BTreeMap::new();
        let shape_defense = BTreeMap::from([(ShapeKind::Hills, 0.25)]);
        let vegetation_defense = BTreeMap::from([
            (VegetationKind::Forest, 0.25),
            (VegetationKind::Jungle, 0.25),
            (VegetationKind::Marsh, -0.15),
        ]);
        let improvement_defense =
            BTreeMap::from([(ImprovementKind::Fort, 0.5), (ImprovementKind::Citadel, 1.0)]);

        Self {
            base_damage: Self::DEFAULT_BASE_DAMAGE,
            terrain_defense,
            shape_defense,
            vegetation_defense,
            improvement_defense,
            river_crossing_penalty: Self::DEFAULT_RIVER_CROSSING_PENALTY,
            aura_range: Self::DEFAULT_AURA_RANGE,
            fortification_per_turn: Self::DEFAULT_FORTIFICATION_PER_TURN,
            fortification_cap: Self::DEFAULT_FORTIFICATION_CAP,
            loss_per_unhappiness: Self::DEFAULT_LOSS_PER_UNHAPPINESS,
            raid_fraction: Self::DEFAULT_RAID_FRACTION,
            sack_enabled: true,
            bounty_fraction: Self::DEFAULT_BOUNTY_FRACTION,
            bounty_modifiers: BTreeMap::new(),
            capturable_templates: BTreeSet::new(),
            garrison_ranged_bonus: BTreeMap::new(),
            default_garrison_ranged_bonus: Self::DEFAULT_GARRISON_RANGED_BONUS,
            captured_health_fraction: Self::DEFAULT_CAPTURED_HEALTH_FRACTION,
        }
    }

    /// Neutral rules: no terrain, river, fortification or happiness effects.
    ///
    /// Only the base damage constant remains, which keeps the raw damage
    /// formula observable in isolation.
    pub fn plain() -> Self {
        Self {
            shape_defense: BTreeMap::new(),
            vegetation_defense: BTreeMap::new(),
            improvement_defense: BTreeMap::new(),
            river_crossing_penalty: 0.0,
            fortification_per_turn: 0.0,
            fortification_cap: 0.0,
            loss_per_unhappiness: 0.0,
            default_garrison_ranged_bonus: 0.0,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_capturable(mut self, template: TemplateId) -> Self {
        self.capturable_templates.insert(template);
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TablesOracle for CombatConfig {
    fn base_damage(&self) -> f64 {
        self.base_damage
    }

    fn tile_defense(&self, tile: &TileInfo) -> f64 {
        let terrain = self.terrain_defense.get(&tile.terrain).copied().unwrap_or(0.0);
        let shape = self.shape_defense.get(&tile.shape).copied().unwrap_or(0.0);
        let vegetation = tile
            .vegetation
            .and_then(|v| self.vegetation_defense.get(&v).copied())
            .unwrap_or(0.0);
        terrain + shape + vegetation
    }

    fn improvement_defense(&self, improvement: ImprovementKind) -> f64 {
        self.improvement_defense
            .get(&improvement)
            .copied()
            .unwrap_or(0.0)
    }

    fn river_crossing_penalty(&self) -> f64 {
        self.river_crossing_penalty
    }

    fn aura_range(&self) -> u32 {
        self.aura_range
    }

    fn fortification_bonus(&self, turns: u32) -> f64 {
        (f64::from(turns) * self.fortification_per_turn).min(self.fortification_cap)
    }

    fn loss_per_unhappiness(&self) -> f64 {
        self.loss_per_unhappiness
    }

    fn raid_fraction(&self) -> f64 {
        self.raid_fraction
    }

    fn sack_enabled(&self) -> bool {
        self.sack_enabled
    }

    fn bounty_fraction(&self) -> f64 {
        self.bounty_fraction
    }

    fn bounty_modifier(&self, faction: FactionId) -> f64 {
        self.bounty_modifiers.get(&faction).copied().unwrap_or(1.0)
    }

    fn is_capturable(&self, template: TemplateId) -> bool {
        self.capturable_templates.contains(&template)
    }

    fn garrison_ranged_bonus(&self, template: TemplateId) -> f64 {
        self.garrison_ranged_bonus
            .get(&template)
            .copied()
            .unwrap_or(self.default_garrison_ranged_bonus)
    }

    fn captured_health_fraction(&self) -> f64 {
        self.captured_health_fraction
    }
}
