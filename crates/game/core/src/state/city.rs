use super::{CityId, FactionId, HexCoord, UnitId};

/// A city and the combat facade unit it fights through.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityState {
    pub id: CityId,
    pub name: String,
    pub owner: FactionId,
    pub location: HexCoord,
    pub population: u32,
    /// Unit of type `City` that attacks and defends on the city's behalf.
    pub facade: UnitId,
}

impl CityState {
    pub fn new(
        id: CityId,
        name: impl Into<String>,
        owner: FactionId,
        location: HexCoord,
        population: u32,
        facade: UnitId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            location,
            population,
            facade,
        }
    }
}
