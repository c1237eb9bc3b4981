use arrayvec::ArrayVec;

use crate::state::{HexCoord, UnitState};

/// Static map oracle exposing terrain and hex-grid geometry.
///
/// Only `tile` is required; the geometric helpers default to plain axial
/// hex math and can be overridden by wrapping maps.
pub trait MapOracle: Send + Sync {
    fn tile(&self, cell: HexCoord) -> Option<TileInfo>;

    fn contains(&self, cell: HexCoord) -> bool {
        self.tile(cell).is_some()
    }

    fn distance(&self, a: HexCoord, b: HexCoord) -> u32 {
        a.distance(b)
    }

    /// On-map neighbours of `cell`.
    fn neighbors(&self, cell: HexCoord) -> ArrayVec<HexCoord, 6> {
        cell.neighbors()
            .into_iter()
            .filter(|n| self.contains(*n))
            .collect()
    }

    /// On-map cells within `radius` steps of `center`, centre included.
    fn cells_in_radius(&self, center: HexCoord, radius: u32) -> Vec<HexCoord> {
        center
            .within_radius(radius)
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Movement points spent stepping from `from` into `to`.
    fn movement_cost(&self, _from: HexCoord, to: HexCoord) -> u32 {
        self.tile(to).map_or(1, |tile| tile.movement_cost())
    }

    /// Placement rule: whether `unit` may end its move on `cell`.
    fn can_occupy(&self, unit: &UnitState, cell: HexCoord) -> bool {
        let Some(tile) = self.tile(cell) else {
            return false;
        };
        if unit.is_city() {
            return false;
        }
        if unit.unit_type.is_naval() {
            tile.terrain.is_water()
        } else {
            !tile.terrain.is_water() && !tile.is_impassable()
        }
    }
}

/// Immutable descriptor of one map cell.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileInfo {
    pub terrain: TerrainKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: ShapeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vegetation: Option<VegetationKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub river: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub improvements: Vec<ImprovementKind>,
}

impl TileInfo {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_vegetation(mut self, vegetation: VegetationKind) -> Self {
        self.vegetation = Some(vegetation);
        self
    }

    #[must_use]
    pub fn with_river(mut self) -> Self {
        self.river = true;
        self
    }

    #[must_use]
    pub fn with_improvement(mut self, improvement: ImprovementKind) -> Self {
        self.improvements.push(improvement);
        self
    }

    /// Hills, mountains and dense vegetation count as rough ground.
    pub fn is_rough(&self) -> bool {
        self.shape != ShapeKind::Flat || self.vegetation.is_some_and(VegetationKind::is_dense)
    }

    pub fn is_mountain(&self) -> bool {
        self.shape == ShapeKind::Mountains
    }

    pub fn is_impassable(&self) -> bool {
        self.is_mountain()
    }

    pub fn movement_cost(&self) -> u32 {
        if self.is_rough() { 2 } else { 1 }
    }

    /// First improvement built on the cell, which is the one that defends.
    pub fn improvement(&self) -> Option<ImprovementKind> {
        self.improvements.first().copied()
    }
}

/// Base terrain of a cell.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    #[default]
    Grassland,
    Plains,
    Desert,
    Tundra,
    Snow,
    Coast,
    Ocean,
    Lake,
}

impl TerrainKind {
    pub fn is_water(self) -> bool {
        matches!(self, TerrainKind::Coast | TerrainKind::Ocean | TerrainKind::Lake)
    }
}

/// Elevation feature layered on the terrain.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ShapeKind {
    #[default]
    Flat,
    Hills,
    Mountains,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VegetationKind {
    Forest,
    Jungle,
    Marsh,
}

impl VegetationKind {
    pub fn is_dense(self) -> bool {
        matches!(self, VegetationKind::Forest | VegetationKind::Jungle)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ImprovementKind {
    Fort,
    Citadel,
    Farm,
    Mine,
    Camp,
}
