use std::collections::BTreeSet;

use crate::state::{HexCoord, UnitState};

/// Reports which cells a unit can currently see.
pub trait VisibilityOracle: Send + Sync {
    fn visible_cells(&self, unit: &UnitState) -> BTreeSet<HexCoord>;

    fn is_visible(&self, unit: &UnitState, cell: HexCoord) -> bool {
        self.visible_cells(unit).contains(&cell)
    }
}
