//! Scenario loader.
//!
//! A scenario bundles everything needed to stage a battle: the hex map,
//! the unit templates, factions and their wars, cities, units, and an
//! ordered list of engagements to play out.

use std::collections::BTreeSet;
use std::path::Path;

use ron::extensions::Extensions;
use serde::Deserialize;
use warfare_core::{
    CityId, CityState, CombatType, FactionId, FactionState, GameState, HexCoord, MapOracle,
    MapSnapshot, TemplateId, TemplateOracle, TemplatesSnapshot, TileInfo, UnitId, UnitState,
    UnitTemplate,
};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Deserialize)]
struct ScenarioRon {
    name: String,
    map: MapRon,
    templates: Vec<TemplateRon>,
    factions: Vec<FactionRon>,
    #[serde(default)]
    wars: Vec<(u32, u32)>,
    #[serde(default)]
    cities: Vec<CityRon>,
    #[serde(default)]
    units: Vec<UnitRon>,
    #[serde(default)]
    engagements: Vec<EngagementSpec>,
}

#[derive(Debug, Deserialize)]
struct MapRon {
    radius: u32,
    #[serde(default)]
    default_tile: TileInfo,
    #[serde(default)]
    tiles: Vec<(HexCoord, TileInfo)>,
}

#[derive(Debug, Deserialize)]
struct TemplateRon {
    id: u32,
    template: UnitTemplate,
}

#[derive(Debug, Deserialize)]
struct FactionRon {
    id: u32,
    name: String,
    #[serde(default)]
    gold: u32,
    #[serde(default)]
    happiness: i32,
    #[serde(default)]
    barbaric: bool,
}

#[derive(Debug, Deserialize)]
struct CityRon {
    id: u32,
    name: String,
    owner: u32,
    location: HexCoord,
    population: u32,
    facade: FacadeRon,
}

#[derive(Debug, Deserialize)]
struct FacadeRon {
    unit: u32,
    template: u32,
    #[serde(default)]
    hitpoints: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct UnitRon {
    id: u32,
    template: u32,
    owner: u32,
    location: HexCoord,
    #[serde(default)]
    hitpoints: Option<u32>,
    #[serde(default)]
    fortified_turns: u32,
}

/// One scripted attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct EngagementSpec {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub combat: CombatType,
}

/// A fully staged battle.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub map: MapSnapshot,
    pub templates: TemplatesSnapshot,
    pub state: GameState,
    pub engagements: Vec<EngagementSpec>,
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {}", path.display(), e))
    }

    /// Parse a scenario from RON text.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let raw: ScenarioRon = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME | Extensions::UNWRAP_NEWTYPES)
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        raw.build()
    }
}

impl ScenarioRon {
    fn build(self) -> LoadResult<Scenario> {
        let mut map =
            MapSnapshot::filled(HexCoord::ORIGIN, self.map.radius, self.map.default_tile);
        for (cell, tile) in self.map.tiles {
            if !map.contains(cell) {
                anyhow::bail!("Tile override {} lies outside the map radius", cell);
            }
            map.set_tile(cell, tile);
        }

        let mut templates = TemplatesSnapshot::default();
        let mut template_ids = BTreeSet::new();
        for entry in self.templates {
            if !template_ids.insert(entry.id) {
                anyhow::bail!("Duplicate template id {}", entry.id);
            }
            templates.insert(TemplateId(entry.id), entry.template);
        }

        let mut state = GameState::new();
        for faction in self.factions {
            let id = FactionId(faction.id);
            if state.faction(id).is_some() {
                anyhow::bail!("Duplicate faction id {}", id);
            }
            let mut entry = FactionState::new(id, faction.name)
                .with_gold(faction.gold)
                .with_happiness(faction.happiness);
            if faction.barbaric {
                entry = entry.barbaric();
            }
            state.add_faction(entry);
        }

        for (a, b) in self.wars {
            let (a, b) = (FactionId(a), FactionId(b));
            require_faction(&state, a)?;
            require_faction(&state, b)?;
            if a == b {
                anyhow::bail!("Faction {} cannot be at war with itself", a);
            }
            state.diplomacy.declare_war(a, b);
        }

        for city in self.cities {
            if state.city(CityId(city.id)).is_some() {
                anyhow::bail!("Duplicate city id {}", city.id);
            }
            let owner = FactionId(city.owner);
            let facade_id = UnitId(city.facade.unit);
            let mut facade = stage_unit(
                &state,
                &map,
                &templates,
                facade_id,
                TemplateId(city.facade.template),
                owner,
                city.location,
            )?;
            if let Some(hp) = city.facade.hitpoints {
                facade.hitpoints.current = hp.min(facade.hitpoints.maximum);
            }
            if !facade.is_city() {
                anyhow::bail!(
                    "City {} facade template {} is not a city template",
                    city.id,
                    city.facade.template
                );
            }
            state.add_unit(facade);
            state.add_city(CityState::new(
                CityId(city.id),
                city.name,
                owner,
                city.location,
                city.population,
                facade_id,
            ));
        }

        for unit in self.units {
            let mut spawned = stage_unit(
                &state,
                &map,
                &templates,
                UnitId(unit.id),
                TemplateId(unit.template),
                FactionId(unit.owner),
                unit.location,
            )?;
            if let Some(hp) = unit.hitpoints {
                spawned.hitpoints.current = hp.min(spawned.hitpoints.maximum);
            }
            spawned.fortified_turns = unit.fortified_turns;
            state.add_unit(spawned);
        }

        for engagement in &self.engagements {
            for id in [engagement.attacker, engagement.defender] {
                if state.unit(id).is_none() {
                    anyhow::bail!("Engagement references unknown unit {}", id);
                }
            }
        }

        Ok(Scenario {
            name: self.name,
            map,
            templates,
            state,
            engagements: self.engagements,
        })
    }
}

/// Spawns a unit from its template after checking ids and placement.
fn stage_unit(
    state: &GameState,
    map: &MapSnapshot,
    templates: &TemplatesSnapshot,
    id: UnitId,
    template: TemplateId,
    owner: FactionId,
    location: HexCoord,
) -> LoadResult<UnitState> {
    require_faction(state, owner)?;
    if state.unit(id).is_some() {
        anyhow::bail!("Duplicate unit id {}", id);
    }
    if !map.contains(location) {
        anyhow::bail!("Unit {} placed off the map at {}", id, location);
    }
    let spec = templates
        .template(template)
        .ok_or_else(|| anyhow::anyhow!("Unit {} uses unknown template {}", id, template))?;
    Ok(spec.spawn(template, id, owner, location))
}

fn require_faction(state: &GameState, id: FactionId) -> LoadResult<()> {
    if state.faction(id).is_none() {
        anyhow::bail!("Unknown faction {}", id);
    }
    Ok(())
}
