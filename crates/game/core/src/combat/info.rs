//! Aggregation of every modifier source into one [`CombatInfo`].
//!
//! Each source is a pure contribution function evaluated against the same
//! battle context; the builder sums them per side and records a breakdown.
//! Adding a source means appending to `CONTRIBUTIONS`.

use super::CombatType;
use super::condition::ConditionContext;
use super::modifier::{ConditionalModifier, applicable_total};
use crate::engine::CombatError;
use crate::env::{GameEnv, TileInfo};
use crate::state::{CombatFlags, CombatSummary, GameState, HexCoord, UnitId, UnitState};

/// Flags taken over from the attacker's summary.
const ATTACKER_CARRIED: CombatFlags = CombatFlags::CAN_MOVE_AFTER_ATTACKING
    .union(CombatFlags::CAN_ATTACK_AFTER_ATTACKING)
    .union(CombatFlags::IGNORES_AMPHIBIOUS_PENALTY);

/// Flags taken over from the defender's summary.
const DEFENDER_CARRIED: CombatFlags = CombatFlags::IGNORES_DEFENSIVE_TERRAIN;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

/// Where a modifier contribution came from.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierSource {
    Terrain,
    Improvement,
    RiverCrossing,
    Promotions,
    Auras,
    Garrison,
    Fortification,
    Unhappiness,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierEntry {
    pub source: ModifierSource,
    pub side: Side,
    pub value: f64,
}

/// Immutable modifier/flag snapshot for one attack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatInfo {
    pub combat_type: CombatType,
    pub attacker_modifier: f64,
    pub defender_modifier: f64,
    /// Move/attack-again/amphibious flags of the attacker plus the defender's
    /// ignores-defensive-terrain flag.
    pub flags: CombatFlags,
    /// Non-zero contributions in the order they were applied.
    pub breakdown: Vec<ModifierEntry>,
}

impl CombatInfo {
    pub fn has(&self, flag: CombatFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn contribution(&self, source: ModifierSource, side: Side) -> f64 {
        self.breakdown
            .iter()
            .filter(|e| e.source == source && e.side == side)
            .map(|e| e.value)
            .sum()
    }
}

/// Everything a contribution function may read.
struct InfoContext<'a> {
    env: GameEnv<'a>,
    conditions: ConditionContext<'a>,
}

impl<'a> InfoContext<'a> {
    fn attacker(&self) -> &'a UnitState {
        self.conditions.subject
    }

    fn defender(&self) -> &'a UnitState {
        self.conditions.opponent
    }

    fn state(&self) -> &'a GameState {
        self.conditions.state
    }

    fn tile(&self) -> &'a TileInfo {
        self.conditions.tile
    }

    fn defender_ignores_terrain(&self) -> bool {
        self.defender()
            .summary
            .has(CombatFlags::IGNORES_DEFENSIVE_TERRAIN)
    }
}

struct Contribution {
    source: ModifierSource,
    side: Side,
    eval: fn(&InfoContext<'_>) -> f64,
}

const CONTRIBUTIONS: &[Contribution] = &[
    Contribution {
        source: ModifierSource::Terrain,
        side: Side::Defender,
        eval: defensive_terrain,
    },
    Contribution {
        source: ModifierSource::Improvement,
        side: Side::Defender,
        eval: defensive_improvement,
    },
    Contribution {
        source: ModifierSource::RiverCrossing,
        side: Side::Attacker,
        eval: river_crossing,
    },
    Contribution {
        source: ModifierSource::Promotions,
        side: Side::Attacker,
        eval: attacker_promotions,
    },
    Contribution {
        source: ModifierSource::Promotions,
        side: Side::Defender,
        eval: defender_promotions,
    },
    Contribution {
        source: ModifierSource::Auras,
        side: Side::Attacker,
        eval: attacker_auras,
    },
    Contribution {
        source: ModifierSource::Auras,
        side: Side::Defender,
        eval: defender_auras,
    },
    Contribution {
        source: ModifierSource::Garrison,
        side: Side::Attacker,
        eval: city_garrison,
    },
    Contribution {
        source: ModifierSource::Fortification,
        side: Side::Defender,
        eval: fortification,
    },
    Contribution {
        source: ModifierSource::Unhappiness,
        side: Side::Attacker,
        eval: attacker_unhappiness,
    },
    Contribution {
        source: ModifierSource::Unhappiness,
        side: Side::Defender,
        eval: defender_unhappiness,
    },
];

/// Builds the [`CombatInfo`] for `attacker` striking `defender` at `location`.
///
/// Fails with an invalid-argument error when either unit is unknown or the
/// location is not on the map.
pub fn build_attack_info(
    state: &GameState,
    env: GameEnv<'_>,
    attacker: UnitId,
    defender: UnitId,
    location: HexCoord,
    combat_type: CombatType,
) -> Result<CombatInfo, CombatError> {
    let attacker = state.unit(attacker).ok_or(CombatError::UnitNotFound(attacker))?;
    let defender = state.unit(defender).ok_or(CombatError::UnitNotFound(defender))?;
    let tile = env
        .map()
        .tile(location)
        .ok_or(CombatError::LocationNotOnMap(location))?;
    Ok(build_info(state, env, attacker, defender, &tile, combat_type))
}

pub(crate) fn build_info(
    state: &GameState,
    env: GameEnv<'_>,
    attacker: &UnitState,
    defender: &UnitState,
    tile: &TileInfo,
    combat_type: CombatType,
) -> CombatInfo {
    let ctx = InfoContext {
        env,
        conditions: ConditionContext {
            state,
            map: env.map(),
            subject: attacker,
            opponent: defender,
            tile,
            combat_type,
        },
    };

    let mut info = CombatInfo {
        combat_type,
        attacker_modifier: 0.0,
        defender_modifier: 0.0,
        flags: (attacker.summary.flags & ATTACKER_CARRIED)
            | (defender.summary.flags & DEFENDER_CARRIED),
        breakdown: Vec::new(),
    };

    for contribution in CONTRIBUTIONS {
        let value = (contribution.eval)(&ctx);
        if value == 0.0 {
            continue;
        }
        match contribution.side {
            Side::Attacker => info.attacker_modifier += value,
            Side::Defender => info.defender_modifier += value,
        }
        info.breakdown.push(ModifierEntry {
            source: contribution.source,
            side: contribution.side,
            value,
        });
    }
    info
}

fn defensive_terrain(ctx: &InfoContext<'_>) -> f64 {
    if ctx.defender_ignores_terrain() {
        return 0.0;
    }
    ctx.env.tables().tile_defense(ctx.tile())
}

fn defensive_improvement(ctx: &InfoContext<'_>) -> f64 {
    if ctx.defender_ignores_terrain() {
        return 0.0;
    }
    ctx.tile()
        .improvement()
        .map_or(0.0, |improvement| ctx.env.tables().improvement_defense(improvement))
}

fn river_crossing(ctx: &InfoContext<'_>) -> f64 {
    let amphibious = ctx
        .attacker()
        .summary
        .has(CombatFlags::IGNORES_AMPHIBIOUS_PENALTY);
    if ctx.conditions.combat_type.is_melee() && ctx.tile().river && !amphibious {
        -ctx.env.tables().river_crossing_penalty()
    } else {
        0.0
    }
}

fn attacker_promotions(ctx: &InfoContext<'_>) -> f64 {
    applicable_total(&ctx.attacker().summary.when_attacking, &ctx.conditions)
}

fn defender_promotions(ctx: &InfoContext<'_>) -> f64 {
    applicable_total(&ctx.defender().summary.when_defending, &ctx.conditions.swapped())
}

fn attacker_auras(ctx: &InfoContext<'_>) -> f64 {
    aura_total(ctx, ctx.attacker(), &ctx.conditions, |s| &s.aura_when_attacking)
}

fn defender_auras(ctx: &InfoContext<'_>) -> f64 {
    aura_total(ctx, ctx.defender(), &ctx.conditions.swapped(), |s| {
        &s.aura_when_defending
    })
}

/// Auras carried by friendly units around `beneficiary`, evaluated from its
/// point of view. The beneficiary's own auras never count.
fn aura_total(
    ctx: &InfoContext<'_>,
    beneficiary: &UnitState,
    conditions: &ConditionContext<'_>,
    auras: fn(&CombatSummary) -> &Vec<ConditionalModifier>,
) -> f64 {
    let map = ctx.env.map();
    let range = ctx.env.tables().aura_range();
    ctx.state()
        .units
        .values()
        .filter(|unit| unit.id != beneficiary.id && unit.owner == beneficiary.owner)
        .filter(|unit| map.distance(unit.location, beneficiary.location) <= range)
        .map(|unit| applicable_total(auras(&unit.summary), conditions))
        .sum()
}

fn city_garrison(ctx: &InfoContext<'_>) -> f64 {
    let attacker = ctx.attacker();
    if !attacker.is_city() || ctx.conditions.combat_type.is_melee() {
        return 0.0;
    }
    let state = ctx.state();
    let Some(city) = state.city_by_facade(attacker.id) else {
        return 0.0;
    };
    state
        .units_at(city.location)
        .find(|unit| unit.id != city.facade && unit.owner == city.owner && !unit.is_city())
        .map_or(0.0, |garrison| {
            ctx.env.tables().garrison_ranged_bonus(garrison.template)
        })
}

fn fortification(ctx: &InfoContext<'_>) -> f64 {
    if ctx.defender_ignores_terrain() {
        return 0.0;
    }
    ctx.env
        .tables()
        .fortification_bonus(ctx.defender().fortified_turns)
}

fn attacker_unhappiness(ctx: &InfoContext<'_>) -> f64 {
    unhappiness(ctx, ctx.attacker())
}

fn defender_unhappiness(ctx: &InfoContext<'_>) -> f64 {
    unhappiness(ctx, ctx.defender())
}

/// Negative net happiness scales into a proportional penalty.
fn unhappiness(ctx: &InfoContext<'_>, unit: &UnitState) -> f64 {
    match ctx.state().faction(unit.owner) {
        Some(faction) if faction.net_happiness < 0 => {
            f64::from(faction.net_happiness) * ctx.env.tables().loss_per_unhappiness()
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatCondition, Restriction, UnitCriterion};
    use crate::env::{ImprovementKind, ShapeKind, TerrainKind, VegetationKind};
    use crate::state::{CityId, UnitType};
    use crate::test_utils::*;

    const ATTACKER: UnitId = UnitId(1);
    const DEFENDER: UnitId = UnitId(2);
    const TARGET: HexCoord = HexCoord::new(1, 0);

    fn duel() -> TestWorld {
        let mut world = TestWorld::new();
        world
            .state
            .add_unit(create_test_warrior(ATTACKER, RED, HexCoord::ORIGIN));
        world
            .state
            .add_unit(create_test_warrior(DEFENDER, BLUE, TARGET));
        world
    }

    fn info(world: &TestWorld, combat_type: CombatType) -> CombatInfo {
        build_attack_info(&world.state, world.env(), ATTACKER, DEFENDER, TARGET, combat_type)
            .unwrap()
    }

    #[test]
    fn plain_ground_yields_no_modifiers() {
        let world = duel();
        let info = info(&world, CombatType::Melee);
        assert_eq!(info.attacker_modifier, 0.0);
        assert_eq!(info.defender_modifier, 0.0);
        assert!(info.breakdown.is_empty());
    }

    #[test]
    fn missing_units_or_cells_are_invalid_arguments() {
        let world = duel();
        let env = world.env();
        assert_eq!(
            build_attack_info(&world.state, env, UnitId(9), DEFENDER, TARGET, CombatType::Melee),
            Err(CombatError::UnitNotFound(UnitId(9)))
        );
        assert_eq!(
            build_attack_info(&world.state, env, ATTACKER, UnitId(8), TARGET, CombatType::Melee),
            Err(CombatError::UnitNotFound(UnitId(8)))
        );
        let off_map = HexCoord::new(40, 40);
        assert_eq!(
            build_attack_info(&world.state, env, ATTACKER, DEFENDER, off_map, CombatType::Melee),
            Err(CombatError::LocationNotOnMap(off_map))
        );
    }

    #[test]
    fn defensive_terrain_and_improvement_help_the_defender() {
        let mut world = duel();
        world.map.set_tile(
            TARGET,
            TileInfo::new(TerrainKind::Plains)
                .with_shape(ShapeKind::Hills)
                .with_vegetation(VegetationKind::Forest)
                .with_improvement(ImprovementKind::Fort),
        );

        let info = info(&world, CombatType::Melee);
        assert!((info.contribution(ModifierSource::Terrain, Side::Defender) - 0.5).abs() < 1e-9);
        assert!(
            (info.contribution(ModifierSource::Improvement, Side::Defender) - 0.5).abs() < 1e-9
        );
        assert!((info.defender_modifier - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ignoring_defensive_terrain_zeroes_terrain_improvement_and_fortification() {
        let mut world = duel();
        world.map.set_tile(
            TARGET,
            TileInfo::new(TerrainKind::Plains)
                .with_shape(ShapeKind::Hills)
                .with_improvement(ImprovementKind::Citadel),
        );
        {
            let defender = world.state.unit_mut(DEFENDER).unwrap();
            defender.fortified_turns = 2;
            defender.summary.flags |= CombatFlags::IGNORES_DEFENSIVE_TERRAIN;
        }

        let info = info(&world, CombatType::Melee);
        assert_eq!(info.defender_modifier, 0.0);
        assert!(info.has(CombatFlags::IGNORES_DEFENSIVE_TERRAIN));
    }

    #[test]
    fn river_penalty_applies_to_melee_only() {
        let mut world = duel();
        world
            .map
            .set_tile(TARGET, TileInfo::new(TerrainKind::Grassland).with_river());

        let melee = info(&world, CombatType::Melee);
        assert!((melee.attacker_modifier + 0.2).abs() < 1e-9);

        let ranged = info(&world, CombatType::Ranged);
        assert_eq!(ranged.attacker_modifier, 0.0);

        world
            .state
            .unit_mut(ATTACKER)
            .unwrap()
            .summary
            .flags |= CombatFlags::IGNORES_AMPHIBIOUS_PENALTY;
        let amphibious = info(&world, CombatType::Melee);
        assert_eq!(amphibious.attacker_modifier, 0.0);
        assert!(amphibious.has(CombatFlags::IGNORES_AMPHIBIOUS_PENALTY));
    }

    #[test]
    fn promotions_are_evaluated_from_each_sides_point_of_view() {
        let mut world = duel();
        // Attacker: +50% against infantry. Defender: +30% when the opponent is mounted.
        world
            .state
            .unit_mut(ATTACKER)
            .unwrap()
            .summary
            .when_attacking
            .push(ConditionalModifier::all(
                0.5,
                vec![CombatCondition::opponent(
                    Restriction::MustBe,
                    UnitCriterion::OfType([UnitType::Infantry].into()),
                )],
            ));
        world
            .state
            .unit_mut(DEFENDER)
            .unwrap()
            .summary
            .when_defending
            .push(ConditionalModifier::all(
                0.3,
                vec![CombatCondition::opponent(
                    Restriction::MustBe,
                    UnitCriterion::OfType([UnitType::Mounted].into()),
                )],
            ));

        let info = info(&world, CombatType::Melee);
        assert!((info.attacker_modifier - 0.5).abs() < 1e-9);
        assert_eq!(info.defender_modifier, 0.0);

        world.state.unit_mut(ATTACKER).unwrap().unit_type = UnitType::Mounted;
        let info = build_attack_info(
            &world.state,
            world.env(),
            ATTACKER,
            DEFENDER,
            TARGET,
            CombatType::Melee,
        )
        .unwrap();
        assert!((info.defender_modifier - 0.3).abs() < 1e-9);
    }

    #[test]
    fn auras_come_from_nearby_friends_only() {
        let mut world = duel();
        let mut general = create_test_warrior(UnitId(3), RED, HexCoord::new(-2, 0));
        general
            .summary
            .aura_when_attacking
            .push(ConditionalModifier::unconditional(0.15));
        world.state.add_unit(general.clone());

        // Out of range general, and an enemy carrying the same aura.
        let mut far = general.clone();
        far.id = UnitId(4);
        far.location = HexCoord::new(-3, 0);
        world.state.add_unit(far);
        let mut enemy = general.clone();
        enemy.id = UnitId(5);
        enemy.owner = BLUE;
        enemy.location = HexCoord::new(0, 1);
        world.state.add_unit(enemy);

        // The attacker's own aura never boosts itself.
        world
            .state
            .unit_mut(ATTACKER)
            .unwrap()
            .summary
            .aura_when_attacking
            .push(ConditionalModifier::unconditional(1.0));

        let info = info(&world, CombatType::Melee);
        assert!((info.contribution(ModifierSource::Auras, Side::Attacker) - 0.15).abs() < 1e-9);
        assert_eq!(info.contribution(ModifierSource::Auras, Side::Defender), 0.0);
    }

    #[test]
    fn defending_auras_boost_the_defender() {
        let mut world = duel();
        let mut banner = create_test_warrior(UnitId(3), BLUE, HexCoord::new(2, 0));
        banner
            .summary
            .aura_when_defending
            .push(ConditionalModifier::unconditional(0.1));
        world.state.add_unit(banner);

        let info = info(&world, CombatType::Melee);
        assert!((info.contribution(ModifierSource::Auras, Side::Defender) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn fortification_accrues_for_the_defender() {
        let mut world = duel();
        world.state.unit_mut(DEFENDER).unwrap().fortified_turns = 1;
        let info = info(&world, CombatType::Melee);
        assert!((info.defender_modifier - 0.2).abs() < 1e-9);
    }

    #[test]
    fn unhappiness_penalises_each_side_independently() {
        let mut world = duel();
        world.state.faction_mut(RED).unwrap().net_happiness = -10;
        world.state.faction_mut(BLUE).unwrap().net_happiness = 7;

        let info = info(&world, CombatType::Melee);
        assert!((info.attacker_modifier + 0.2).abs() < 1e-9);
        assert_eq!(info.defender_modifier, 0.0);

        world.state.faction_mut(RED).unwrap().net_happiness = -20;
        let worse = build_attack_info(
            &world.state,
            world.env(),
            ATTACKER,
            DEFENDER,
            TARGET,
            CombatType::Melee,
        )
        .unwrap();
        assert!(worse.attacker_modifier < info.attacker_modifier);
    }

    #[test]
    fn garrisoned_city_gets_a_ranged_bonus() {
        let mut world = TestWorld::new();
        let city_cell = HexCoord::new(-1, 0);
        add_test_city(&mut world.state, CityId(1), RED, city_cell, 3, ATTACKER);
        world.state.add_unit(create_test_warrior(DEFENDER, BLUE, TARGET));

        let ungarrisoned = info(&world, CombatType::Ranged);
        assert_eq!(ungarrisoned.attacker_modifier, 0.0);

        world
            .state
            .add_unit(create_test_warrior(UnitId(3), RED, city_cell));
        world.tables.garrison_ranged_bonus.insert(WARRIOR, 0.4);

        let garrisoned = info(&world, CombatType::Ranged);
        assert!(
            (garrisoned.contribution(ModifierSource::Garrison, Side::Attacker) - 0.4).abs() < 1e-9
        );
    }

    #[test]
    fn carried_flags_come_from_the_right_side() {
        let mut world = duel();
        world.state.unit_mut(ATTACKER).unwrap().summary.flags =
            CombatFlags::CAN_MOVE_AFTER_ATTACKING | CombatFlags::IGNORES_DEFENSIVE_TERRAIN;
        world.state.unit_mut(DEFENDER).unwrap().summary.flags =
            CombatFlags::CAN_ATTACK_AFTER_ATTACKING;

        let info = info(&world, CombatType::Melee);
        assert!(info.has(CombatFlags::CAN_MOVE_AFTER_ATTACKING));
        assert!(!info.has(CombatFlags::CAN_ATTACK_AFTER_ATTACKING));
        assert!(!info.has(CombatFlags::IGNORES_DEFENSIVE_TERRAIN));
    }
}
