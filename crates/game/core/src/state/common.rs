use std::fmt;

use arrayvec::ArrayVec;

/// Identifier of a unit (or city combat facade) tracked in the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a faction (owner of units, cities and gold).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactionId(pub u32);

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction:{}", self.0)
    }
}

/// Identifier of a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityId(pub u32);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "city:{}", self.0)
    }
}

/// Identifier of a unit template (archetype) in the template catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateId(pub u32);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template:{}", self.0)
    }
}

/// Axial hex coordinate identifying one map cell.
///
/// The third cube axis is implicit (`s = -q - r`), so distance and neighbour
/// lookups stay integer-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    /// Axial offsets of the six neighbours, clockwise from east.
    pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Number of steps between two cells on the hex grid.
    pub fn distance(self, other: Self) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        (dq + dr + ds) / 2
    }

    pub fn neighbors(self) -> ArrayVec<HexCoord, 6> {
        Self::DIRECTIONS
            .iter()
            .map(|&(dq, dr)| HexCoord::new(self.q + dq, self.r + dr))
            .collect()
    }

    /// All cells within `radius` steps, including the centre.
    pub fn within_radius(self, radius: u32) -> Vec<HexCoord> {
        let n = radius as i32;
        let mut cells = Vec::with_capacity((3 * n * (n + 1) + 1) as usize);
        for dq in -n..=n {
            let lo = (-n).max(-dq - n);
            let hi = n.min(-dq + n);
            for dr in lo..=hi {
                cells.push(HexCoord::new(self.q + dq, self.r + dr));
            }
        }
        cells
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Integer resource meter (hitpoints, movement points) tracked per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    /// Subtracts `amount`, never going below zero.
    pub fn drain(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_distance_is_symmetric_and_counts_steps() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(2, -1);
        assert_eq!(a.distance(b), 2);
        assert_eq!(b.distance(a), 2);
        assert_eq!(a.distance(a), 0);
        assert_eq!(a.distance(HexCoord::new(-3, 3)), 3);
    }

    #[test]
    fn every_neighbor_is_one_step_away() {
        let center = HexCoord::new(4, -2);
        let neighbors = center.neighbors();
        assert_eq!(neighbors.len(), 6);
        assert!(neighbors.iter().all(|n| center.distance(*n) == 1));
    }

    #[test]
    fn radius_contains_expected_cell_count() {
        let center = HexCoord::ORIGIN;
        assert_eq!(center.within_radius(0), vec![center]);
        assert_eq!(center.within_radius(1).len(), 7);
        assert_eq!(center.within_radius(2).len(), 19);
        assert!(center.within_radius(2).iter().all(|c| center.distance(*c) <= 2));
    }

    #[test]
    fn drain_saturates_at_zero() {
        let mut hp = ResourceMeter::full(10);
        hp.drain(4);
        assert_eq!(hp.current, 6);
        hp.drain(40);
        assert!(hp.is_depleted());
    }
}
