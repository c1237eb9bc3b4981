//! Traits describing the collaborators combat reads from.
//!
//! Oracles expose map geometry, balance tables, unit templates, visibility
//! and ownership rules. The [`Env`] aggregate bundles them so the engine can
//! access everything it needs without hard coupling to concrete
//! implementations.
mod map;
mod ownership;
mod snapshot;
mod tables;
mod templates;
mod visibility;

pub use map::{ImprovementKind, MapOracle, ShapeKind, TerrainKind, TileInfo, VegetationKind};
pub use ownership::OwnershipOracle;
pub use snapshot::{MapSnapshot, OwnershipRules, SightRangeVisibility, TemplatesSnapshot};
pub use tables::TablesOracle;
pub use templates::{TemplateOracle, UnitTemplate};
pub use visibility::VisibilityOracle;

/// Aggregates the read-only oracles required by the combat engine.
pub struct Env<'a, M, T, P, V, O>
where
    M: MapOracle + ?Sized,
    T: TablesOracle + ?Sized,
    P: TemplateOracle + ?Sized,
    V: VisibilityOracle + ?Sized,
    O: OwnershipOracle + ?Sized,
{
    map: &'a M,
    tables: &'a T,
    templates: &'a P,
    visibility: &'a V,
    ownership: &'a O,
}

pub type GameEnv<'a> = Env<
    'a,
    dyn MapOracle + 'a,
    dyn TablesOracle + 'a,
    dyn TemplateOracle + 'a,
    dyn VisibilityOracle + 'a,
    dyn OwnershipOracle + 'a,
>;

// Only references are held, so copying never requires the oracles to be `Clone`.
impl<M, T, P, V, O> Clone for Env<'_, M, T, P, V, O>
where
    M: MapOracle + ?Sized,
    T: TablesOracle + ?Sized,
    P: TemplateOracle + ?Sized,
    V: VisibilityOracle + ?Sized,
    O: OwnershipOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, T, P, V, O> Copy for Env<'_, M, T, P, V, O>
where
    M: MapOracle + ?Sized,
    T: TablesOracle + ?Sized,
    P: TemplateOracle + ?Sized,
    V: VisibilityOracle + ?Sized,
    O: OwnershipOracle + ?Sized,
{
}

impl<'a, M, T, P, V, O> Env<'a, M, T, P, V, O>
where
    M: MapOracle + ?Sized,
    T: TablesOracle + ?Sized,
    P: TemplateOracle + ?Sized,
    V: VisibilityOracle + ?Sized,
    O: OwnershipOracle + ?Sized,
{
    pub fn new(
        map: &'a M,
        tables: &'a T,
        templates: &'a P,
        visibility: &'a V,
        ownership: &'a O,
    ) -> Self {
        Self {
            map,
            tables,
            templates,
            visibility,
            ownership,
        }
    }

    pub fn map(&self) -> &'a M {
        self.map
    }

    pub fn tables(&self) -> &'a T {
        self.tables
    }

    pub fn templates(&self) -> &'a P {
        self.templates
    }

    pub fn visibility(&self) -> &'a V {
        self.visibility
    }

    pub fn ownership(&self) -> &'a O {
        self.ownership
    }
}

impl<'a, M, T, P, V, O> Env<'a, M, T, P, V, O>
where
    M: MapOracle + 'a,
    T: TablesOracle + 'a,
    P: TemplateOracle + 'a,
    V: VisibilityOracle + 'a,
    O: OwnershipOracle + 'a,
{
    /// Erases concrete oracle types into the trait-object environment.
    pub fn into_game_env(self) -> GameEnv<'a> {
        Env {
            map: self.map as &'a (dyn MapOracle + 'a),
            tables: self.tables as &'a (dyn TablesOracle + 'a),
            templates: self.templates as &'a (dyn TemplateOracle + 'a),
            visibility: self.visibility as &'a (dyn VisibilityOracle + 'a),
            ownership: self.ownership as &'a (dyn OwnershipOracle + 'a),
        }
    }
}
