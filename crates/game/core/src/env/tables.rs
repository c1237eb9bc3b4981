use crate::env::{ImprovementKind, TileInfo};
use crate::state::{FactionId, TemplateId};

/// Oracle providing combat rules and balance values.
///
/// Every tunable the combat pipeline reads goes through this trait; it
/// defines no unit data (see [`super::TemplateOracle`] for that).
pub trait TablesOracle: Send + Sync {
    /// Damage dealt by either side when both effective strengths are equal.
    fn base_damage(&self) -> f64;

    /// Summed terrain, shape and vegetation defensiveness of a tile.
    fn tile_defense(&self, tile: &TileInfo) -> f64;

    fn improvement_defense(&self, improvement: ImprovementKind) -> f64;

    /// Positive magnitude subtracted from a melee attacker striking into a river cell.
    fn river_crossing_penalty(&self) -> f64;

    fn aura_range(&self) -> u32;

    /// Defensive bonus accrued after `turns` consecutive fortified turns.
    fn fortification_bonus(&self, turns: u32) -> f64;

    fn loss_per_unhappiness(&self) -> f64;

    /// Fraction of damage dealt to a city that is stolen as gold.
    fn raid_fraction(&self) -> f64;

    fn sack_enabled(&self) -> bool;

    /// Fraction of the loser's production cost paid as bounty.
    fn bounty_fraction(&self) -> f64;

    fn bounty_modifier(&self, faction: FactionId) -> f64;

    fn is_capturable(&self, template: TemplateId) -> bool;

    /// Ranged bonus a city gains from a garrison built from `template`.
    fn garrison_ranged_bonus(&self, template: TemplateId) -> f64;

    /// Share of maximum hitpoints a captured unit is left with.
    fn captured_health_fraction(&self) -> f64;
}
