//! Authoritative simulation state touched by combat.
//!
//! Units, factions, cities and war relations live here. Runtime layers clone
//! or query this state but mutate it exclusively through the combat engine
//! and the move-completion entry point.
mod city;
mod common;
mod faction;
mod unit;

use std::collections::BTreeMap;

pub use city::CityState;
pub use common::{CityId, FactionId, HexCoord, ResourceMeter, TemplateId, UnitId};
pub use faction::{DiplomacyState, FactionState};
pub use unit::{CombatFlags, CombatSummary, UnitState, UnitType};

/// Reasons a deferred move could not be completed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveFailure {
    #[error("unit {0} no longer exists")]
    UnitGone(UnitId),

    #[error("unit {unit} left {expected} before the move completed (now at {actual})")]
    UnitDisplaced {
        unit: UnitId,
        expected: HexCoord,
        actual: HexCoord,
    },
}

/// Canonical snapshot of the simulation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub units: BTreeMap<UnitId, UnitState>,
    pub factions: BTreeMap<FactionId, FactionState>,
    pub cities: BTreeMap<CityId, CityState>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub diplomacy: DiplomacyState,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_faction(&mut self, faction: FactionState) {
        self.factions.insert(faction.id, faction);
    }

    pub fn add_unit(&mut self, unit: UnitState) {
        self.units.insert(unit.id, unit);
    }

    pub fn add_city(&mut self, city: CityState) {
        self.cities.insert(city.id, city);
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.get_mut(&id)
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Option<UnitState> {
        self.units.remove(&id)
    }

    /// Units standing on `cell`, in id order.
    pub fn units_at(&self, cell: HexCoord) -> impl Iterator<Item = &UnitState> + '_ {
        self.units.values().filter(move |unit| unit.location == cell)
    }

    pub fn faction(&self, id: FactionId) -> Option<&FactionState> {
        self.factions.get(&id)
    }

    pub fn faction_mut(&mut self, id: FactionId) -> Option<&mut FactionState> {
        self.factions.get_mut(&id)
    }

    pub fn city(&self, id: CityId) -> Option<&CityState> {
        self.cities.get(&id)
    }

    /// City represented by the given combat facade, if any.
    pub fn city_by_facade(&self, facade: UnitId) -> Option<&CityState> {
        self.cities.values().find(|city| city.facade == facade)
    }

    pub fn total_city_population(&self, owner: FactionId) -> u32 {
        self.cities
            .values()
            .filter(|city| city.owner == owner)
            .map(|city| city.population)
            .sum()
    }

    /// Moves up to `amount` gold between treasuries; returns the amount moved.
    ///
    /// Nothing is withdrawn when the recipient is unknown.
    pub fn transfer_gold(&mut self, from: FactionId, to: FactionId, amount: u32) -> u32 {
        if from == to || amount == 0 || !self.factions.contains_key(&to) {
            return 0;
        }
        let taken = match self.factions.get_mut(&from) {
            Some(source) => source.withdraw(amount),
            None => return 0,
        };
        if let Some(target) = self.factions.get_mut(&to) {
            target.deposit(taken);
        }
        taken
    }

    /// Credits gold minted by the rules (bounties); returns the amount credited.
    pub fn grant_gold(&mut self, to: FactionId, amount: u32) -> u32 {
        match self.factions.get_mut(&to) {
            Some(faction) if amount > 0 => {
                faction.deposit(amount);
                amount
            }
            _ => 0,
        }
    }

    /// Relocates a unit that is still where the move was issued from.
    pub fn relocate_unit(
        &mut self,
        id: UnitId,
        from: HexCoord,
        to: HexCoord,
    ) -> Result<(), MoveFailure> {
        let unit = self.units.get_mut(&id).ok_or(MoveFailure::UnitGone(id))?;
        if unit.location != from {
            return Err(MoveFailure::UnitDisplaced {
                unit: id,
                expected: from,
                actual: unit.location,
            });
        }
        unit.location = to;
        unit.fortified_turns = 0;
        Ok(())
    }
}
