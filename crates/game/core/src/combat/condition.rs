//! Atomic combat predicates.
//!
//! A [`CombatCondition`] pairs a target (subject, opponent, location or
//! combat type) with a restriction and a criterion valid for that target.
//! The enum shape makes a mismatched target/criterion pair unrepresentable.

use std::collections::BTreeSet;

use super::CombatType;
use crate::env::{MapOracle, ShapeKind, TerrainKind, TileInfo, VegetationKind};
use crate::state::{GameState, UnitState, UnitType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Restriction {
    #[default]
    MustBe,
    MustNotBe,
}

impl Restriction {
    #[inline]
    pub fn apply(self, holds: bool) -> bool {
        match self {
            Restriction::MustBe => holds,
            Restriction::MustNotBe => !holds,
        }
    }
}

/// Criteria about a unit taking part in the combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitCriterion {
    OfType(BTreeSet<UnitType>),
    Wounded,
    /// A friendly unit of one of these types stands on a neighbouring cell.
    AdjacentToAlly(BTreeSet<UnitType>),
}

/// Criteria about the cell the battle is fought on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocationCriterion {
    OfTerrain(BTreeSet<TerrainKind>),
    OfShape(BTreeSet<ShapeKind>),
    OfVegetation(BTreeSet<VegetationKind>),
    RoughTerrain,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatCondition {
    Subject {
        restriction: Restriction,
        criterion: UnitCriterion,
    },
    Opponent {
        restriction: Restriction,
        criterion: UnitCriterion,
    },
    Location {
        restriction: Restriction,
        criterion: LocationCriterion,
    },
    CombatType {
        restriction: Restriction,
        combat_type: CombatType,
    },
}

impl CombatCondition {
    pub fn subject(restriction: Restriction, criterion: UnitCriterion) -> Self {
        Self::Subject {
            restriction,
            criterion,
        }
    }

    pub fn opponent(restriction: Restriction, criterion: UnitCriterion) -> Self {
        Self::Opponent {
            restriction,
            criterion,
        }
    }

    pub fn location(restriction: Restriction, criterion: LocationCriterion) -> Self {
        Self::Location {
            restriction,
            criterion,
        }
    }

    pub fn combat_type(restriction: Restriction, combat_type: CombatType) -> Self {
        Self::CombatType {
            restriction,
            combat_type,
        }
    }
}

/// Live facts a condition is evaluated against.
///
/// `subject` is the unit whose modifier is being tested; `opponent` is the
/// unit it is fighting. `tile` describes the defender's cell.
#[derive(Clone, Copy)]
pub struct ConditionContext<'a> {
    pub state: &'a GameState,
    pub map: &'a dyn MapOracle,
    pub subject: &'a UnitState,
    pub opponent: &'a UnitState,
    pub tile: &'a TileInfo,
    pub combat_type: CombatType,
}

impl<'a> ConditionContext<'a> {
    /// Same battle, seen from the other combatant.
    pub fn swapped(&self) -> Self {
        Self {
            subject: self.opponent,
            opponent: self.subject,
            ..*self
        }
    }
}

pub fn is_condition_met(condition: &CombatCondition, ctx: &ConditionContext<'_>) -> bool {
    match condition {
        CombatCondition::Subject {
            restriction,
            criterion,
        } => restriction.apply(unit_matches(criterion, ctx.subject, ctx)),
        CombatCondition::Opponent {
            restriction,
            criterion,
        } => restriction.apply(unit_matches(criterion, ctx.opponent, ctx)),
        CombatCondition::Location {
            restriction,
            criterion,
        } => restriction.apply(location_matches(criterion, ctx.tile)),
        CombatCondition::CombatType {
            restriction,
            combat_type,
        } => restriction.apply(*combat_type == ctx.combat_type),
    }
}

fn unit_matches(criterion: &UnitCriterion, unit: &UnitState, ctx: &ConditionContext<'_>) -> bool {
    match criterion {
        UnitCriterion::OfType(types) => types.contains(&unit.unit_type),
        UnitCriterion::Wounded => unit.is_wounded(),
        UnitCriterion::AdjacentToAlly(types) => has_adjacent_ally(unit, types, ctx),
    }
}

fn has_adjacent_ally(
    unit: &UnitState,
    types: &BTreeSet<UnitType>,
    ctx: &ConditionContext<'_>,
) -> bool {
    ctx.map.neighbors(unit.location).into_iter().any(|cell| {
        ctx.state.units_at(cell).any(|other| {
            other.id != unit.id && other.owner == unit.owner && types.contains(&other.unit_type)
        })
    })
}

fn location_matches(criterion: &LocationCriterion, tile: &TileInfo) -> bool {
    match criterion {
        LocationCriterion::OfTerrain(terrains) => terrains.contains(&tile.terrain),
        LocationCriterion::OfShape(shapes) => shapes.contains(&tile.shape),
        LocationCriterion::OfVegetation(vegetation) => tile
            .vegetation
            .is_some_and(|kind| vegetation.contains(&kind)),
        LocationCriterion::RoughTerrain => tile.is_rough(),
    }
}
