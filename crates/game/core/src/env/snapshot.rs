//! Data-backed oracle implementations.
//!
//! Each snapshot is a plain serializable value that implements one oracle
//! trait, so loaders can build a complete environment from scenario files
//! and tests can assemble one inline.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    MapOracle, OwnershipOracle, TemplateOracle, TileInfo, UnitTemplate, VisibilityOracle,
};
use crate::state::{FactionState, HexCoord, TemplateId, UnitState, UnitType};

/// Hex map stored as a sparse cell → tile table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapSnapshot {
    pub tiles: BTreeMap<HexCoord, TileInfo>,
}

impl MapSnapshot {
    pub fn new(tiles: BTreeMap<HexCoord, TileInfo>) -> Self {
        Self { tiles }
    }

    /// Hexagonal map of the given radius filled with one tile kind.
    pub fn filled(center: HexCoord, radius: u32, tile: TileInfo) -> Self {
        let tiles = center
            .within_radius(radius)
            .into_iter()
            .map(|cell| (cell, tile.clone()))
            .collect();
        Self { tiles }
    }

    pub fn set_tile(&mut self, cell: HexCoord, tile: TileInfo) {
        self.tiles.insert(cell, tile);
    }
}

impl MapOracle for MapSnapshot {
    fn tile(&self, cell: HexCoord) -> Option<TileInfo> {
        self.tiles.get(&cell).cloned()
    }

    fn contains(&self, cell: HexCoord) -> bool {
        self.tiles.contains_key(&cell)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplatesSnapshot {
    pub templates: BTreeMap<TemplateId, UnitTemplate>,
}

impl TemplatesSnapshot {
    pub fn new(templates: BTreeMap<TemplateId, UnitTemplate>) -> Self {
        Self { templates }
    }

    pub fn insert(&mut self, id: TemplateId, template: UnitTemplate) {
        self.templates.insert(id, template);
    }
}

impl TemplateOracle for TemplatesSnapshot {
    fn template(&self, id: TemplateId) -> Option<UnitTemplate> {
        self.templates.get(&id).cloned()
    }
}

/// Visibility by plain sight radius around the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SightRangeVisibility {
    pub default_range: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub by_type: BTreeMap<UnitType, u32>,
}

impl SightRangeVisibility {
    pub const DEFAULT_SIGHT_RANGE: u32 = 2;

    pub fn new(default_range: u32) -> Self {
        Self {
            default_range,
            by_type: BTreeMap::new(),
        }
    }

    pub fn sight_range(&self, unit_type: UnitType) -> u32 {
        self.by_type
            .get(&unit_type)
            .copied()
            .unwrap_or(self.default_range)
    }
}

impl Default for SightRangeVisibility {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIGHT_RANGE)
    }
}

impl VisibilityOracle for SightRangeVisibility {
    fn visible_cells(&self, unit: &UnitState) -> BTreeSet<HexCoord> {
        unit.location
            .within_radius(self.sight_range(unit.unit_type))
            .into_iter()
            .collect()
    }

    fn is_visible(&self, unit: &UnitState, cell: HexCoord) -> bool {
        unit.location.distance(cell) <= self.sight_range(unit.unit_type)
    }
}

/// Capture permissions.
///
/// City facades never change hands through capture; raiders may only take
/// units over when explicitly allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnershipRules {
    pub barbarians_capture: bool,
}

impl OwnershipOracle for OwnershipRules {
    fn can_change_owner(&self, unit: &UnitState, new_owner: &FactionState) -> bool {
        if unit.is_city() || unit.owner == new_owner.id {
            return false;
        }
        !new_owner.barbaric || self.barbarians_capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TerrainKind;
    use crate::state::{FactionId, UnitId};

    #[test]
    fn map_neighbors_stay_on_the_map() {
        let map = MapSnapshot::filled(HexCoord::ORIGIN, 1, TileInfo::new(TerrainKind::Plains));
        assert_eq!(map.neighbors(HexCoord::ORIGIN).len(), 6);
        // Edge cell: only the centre and two ring cells are adjacent on-map.
        assert_eq!(map.neighbors(HexCoord::new(1, 0)).len(), 3);
        assert_eq!(map.cells_in_radius(HexCoord::ORIGIN, 5).len(), 7);
    }

    #[test]
    fn sight_range_can_differ_per_type() {
        let mut visibility = SightRangeVisibility::new(1);
        visibility.by_type.insert(UnitType::Mounted, 3);
        let rider = UnitState::new(
            UnitId(1),
            TemplateId(1),
            UnitType::Mounted,
            FactionId(1),
            HexCoord::ORIGIN,
        );

        assert!(visibility.is_visible(&rider, HexCoord::new(3, 0)));
        assert!(visibility.visible_cells(&rider).contains(&HexCoord::new(0, -3)));
        assert!(!visibility.is_visible(&rider, HexCoord::new(4, 0)));
    }

    #[test]
    fn barbarians_capture_only_when_allowed() {
        let unit = UnitState::new(
            UnitId(1),
            TemplateId(1),
            UnitType::Civilian,
            FactionId(1),
            HexCoord::ORIGIN,
        );
        let raiders = FactionState::new(FactionId(9), "Raiders").barbaric();
        let rome = FactionState::new(FactionId(2), "Rome");

        assert!(OwnershipRules::default().can_change_owner(&unit, &rome));
        assert!(!OwnershipRules::default().can_change_owner(&unit, &raiders));
        let lenient = OwnershipRules {
            barbarians_capture: true,
        };
        assert!(lenient.can_change_owner(&unit, &raiders));
    }
}
