use crate::state::{FactionState, UnitState};

/// Decides whether a unit may be taken over by another faction.
pub trait OwnershipOracle: Send + Sync {
    fn can_change_owner(&self, unit: &UnitState, new_owner: &FactionState) -> bool;
}
