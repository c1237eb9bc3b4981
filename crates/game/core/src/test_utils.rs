//! Shared fixtures for unit tests.
//!
//! Two factions at war on a flat grassland disc, plus helpers for the unit
//! archetypes the tests use most.

use crate::combat::CombatType;
use crate::combat::info::build_info;
use crate::combat::{DamageDealt, UnitCombatResults};
use crate::config::CombatConfig;
use crate::engine::{
    Aftermath, CombatantSnapshot, PostCombatResponder, ResponderChain, ResponderContext,
};
use crate::env::{
    Env, GameEnv, MapSnapshot, OwnershipRules, SightRangeVisibility, TemplatesSnapshot,
    TerrainKind, TileInfo, UnitTemplate,
};
use crate::state::{
    CityId, CityState, FactionId, FactionState, GameState, HexCoord, TemplateId, UnitId, UnitState,
    UnitType,
};

pub const RED: FactionId = FactionId(1);
pub const BLUE: FactionId = FactionId(2);

pub const WARRIOR: TemplateId = TemplateId(1);
pub const ARCHER: TemplateId = TemplateId(2);
pub const CITY: TemplateId = TemplateId(3);
pub const WORKER: TemplateId = TemplateId(4);

/// Red and Blue with 100 gold each, at war with each other.
pub fn create_test_state() -> GameState {
    let mut state = GameState::new();
    state.add_faction(FactionState::new(RED, "Red").with_gold(100));
    state.add_faction(FactionState::new(BLUE, "Blue").with_gold(100));
    state.diplomacy.declare_war(RED, BLUE);
    state
}

pub fn create_test_warrior(id: UnitId, owner: FactionId, location: HexCoord) -> UnitState {
    UnitState::new(id, WARRIOR, UnitType::Infantry, owner, location).with_melee(20)
}

pub fn create_test_archer(id: UnitId, owner: FactionId, location: HexCoord) -> UnitState {
    UnitState::new(id, ARCHER, UnitType::Archery, owner, location)
        .with_melee(5)
        .with_ranged(15, 2)
}

pub fn create_test_worker(id: UnitId, owner: FactionId, location: HexCoord) -> UnitState {
    UnitState::new(id, WORKER, UnitType::Civilian, owner, location).with_melee(0)
}

/// Adds a city together with its facade unit.
pub fn add_test_city(
    state: &mut GameState,
    city: CityId,
    owner: FactionId,
    location: HexCoord,
    population: u32,
    facade: UnitId,
) {
    state.add_unit(
        UnitState::new(facade, CITY, UnitType::City, owner, location)
            .with_melee(10)
            .with_ranged(12, 2)
            .with_hitpoints(200, 200),
    );
    state.add_city(CityState::new(
        city,
        format!("City {}", city.0),
        owner,
        location,
        population,
        facade,
    ));
}

pub fn create_test_map() -> MapSnapshot {
    MapSnapshot::filled(HexCoord::ORIGIN, 6, TileInfo::new(TerrainKind::Grassland))
}

pub fn create_test_templates() -> TemplatesSnapshot {
    let mut templates = TemplatesSnapshot::default();
    templates.insert(WARRIOR, UnitTemplate::new("Warrior", UnitType::Infantry, 40));
    templates.insert(ARCHER, UnitTemplate::new("Archer", UnitType::Archery, 40));
    templates.insert(WORKER, UnitTemplate::new("Worker", UnitType::Civilian, 30));
    templates.insert(CITY, UnitTemplate::new("City", UnitType::City, 0));
    templates
}

/// State plus owned oracle snapshots, so tests can tweak either side.
pub struct TestWorld {
    pub state: GameState,
    pub map: MapSnapshot,
    pub tables: CombatConfig,
    pub templates: TemplatesSnapshot,
    pub visibility: SightRangeVisibility,
    pub ownership: OwnershipRules,
}

impl TestWorld {
    pub fn new() -> Self {
        Self {
            state: create_test_state(),
            map: create_test_map(),
            tables: CombatConfig::default(),
            templates: create_test_templates(),
            visibility: SightRangeVisibility::new(3),
            ownership: OwnershipRules::default(),
        }
    }

    pub fn env(&self) -> GameEnv<'_> {
        Env::new(
            &self.map,
            &self.tables,
            &self.templates,
            &self.visibility,
            &self.ownership,
        )
        .into_game_env()
    }

    /// Mutable state alongside an environment borrowed from the other fields.
    pub fn split(&mut self) -> (&mut GameState, GameEnv<'_>) {
        let env = Env::new(
            &self.map,
            &self.tables,
            &self.templates,
            &self.visibility,
            &self.ownership,
        )
        .into_game_env();
        (&mut self.state, env)
    }
}

/// Applies `damage` and runs a single responder if it applies.
///
/// Returns `None` when the responder's trigger did not fire.
pub fn run_responder(
    world: &mut TestWorld,
    responder: &dyn PostCombatResponder,
    attacker: UnitId,
    defender: UnitId,
    combat_type: CombatType,
    damage: DamageDealt,
) -> Option<Aftermath> {
    with_aftermath(world, attacker, defender, combat_type, damage, |ctx, state| {
        if !responder.applies(ctx, state) {
            return None;
        }
        let mut aftermath = Aftermath::default();
        responder.respond(ctx, state, &mut aftermath);
        Some(aftermath)
    })
    .flatten()
}

/// Applies `damage` and runs a whole responder chain.
pub fn run_chain(
    world: &mut TestWorld,
    chain: &ResponderChain,
    attacker: UnitId,
    defender: UnitId,
    combat_type: CombatType,
    damage: DamageDealt,
) -> Option<Aftermath> {
    with_aftermath(world, attacker, defender, combat_type, damage, |ctx, state| {
        let mut aftermath = Aftermath::default();
        chain.run(ctx, state, &mut aftermath);
        aftermath
    })
}

fn with_aftermath<R>(
    world: &mut TestWorld,
    attacker: UnitId,
    defender: UnitId,
    combat_type: CombatType,
    damage: DamageDealt,
    respond: impl FnOnce(&ResponderContext<'_>, &mut GameState) -> R,
) -> Option<R> {
    let (state, env) = world.split();

    let info = {
        let attacker_unit = state.unit(attacker)?;
        let defender_unit = state.unit(defender)?;
        let tile = env.map().tile(defender_unit.location)?;
        build_info(
            state,
            env,
            attacker_unit,
            defender_unit,
            &tile,
            combat_type,
        )
    };

    state.unit_mut(attacker)?.hitpoints.drain(damage.to_attacker);
    state.unit_mut(defender)?.hitpoints.drain(damage.to_defender);

    let attacker_snapshot = CombatantSnapshot::capture(state, state.unit(attacker)?);
    let defender_snapshot = CombatantSnapshot::capture(state, state.unit(defender)?);
    let results = UnitCombatResults {
        attacker,
        defender,
        damage_to_attacker: damage.to_attacker,
        damage_to_defender: damage.to_defender,
        info,
    };
    let ctx = ResponderContext {
        env,
        info: &results.info,
        results: &results,
        attacker: attacker_snapshot,
        defender: defender_snapshot,
    };

    Some(respond(&ctx, state))
}
