use super::condition::{CombatCondition, ConditionContext, is_condition_met};

/// How a modifier's conditions combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConditionJoin {
    #[default]
    And,
    Or,
}

/// A fractional combat bonus gated by a list of conditions.
///
/// An empty condition list always applies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalModifier {
    magnitude: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    conditions: Vec<CombatCondition>,
    #[cfg_attr(feature = "serde", serde(default))]
    join: ConditionJoin,
}

impl ConditionalModifier {
    pub fn new(magnitude: f64, conditions: Vec<CombatCondition>, join: ConditionJoin) -> Self {
        Self {
            magnitude,
            conditions,
            join,
        }
    }

    pub fn unconditional(magnitude: f64) -> Self {
        Self::new(magnitude, Vec::new(), ConditionJoin::And)
    }

    pub fn all(magnitude: f64, conditions: Vec<CombatCondition>) -> Self {
        Self::new(magnitude, conditions, ConditionJoin::And)
    }

    pub fn any(magnitude: f64, conditions: Vec<CombatCondition>) -> Self {
        Self::new(magnitude, conditions, ConditionJoin::Or)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn conditions(&self) -> &[CombatCondition] {
        &self.conditions
    }

    pub fn join(&self) -> ConditionJoin {
        self.join
    }

    pub fn applies(&self, ctx: &ConditionContext<'_>) -> bool {
        if self.conditions.is_empty() {
            return true;
        }
        match self.join {
            ConditionJoin::And => self.conditions.iter().all(|c| is_condition_met(c, ctx)),
            ConditionJoin::Or => self.conditions.iter().any(|c| is_condition_met(c, ctx)),
        }
    }
}

/// Sum of the magnitudes in `modifiers` that apply in `ctx`.
pub fn applicable_total<'m>(
    modifiers: impl IntoIterator<Item = &'m ConditionalModifier>,
    ctx: &ConditionContext<'_>,
) -> f64 {
    modifiers
        .into_iter()
        .filter(|m| m.applies(ctx))
        .map(ConditionalModifier::magnitude)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatType, Restriction, UnitCriterion};
    use crate::env::{MapSnapshot, TerrainKind, TileInfo};
    use crate::state::{GameState, HexCoord, UnitId};
    use crate::test_utils::*;

    fn fixture() -> (GameState, MapSnapshot, TileInfo) {
        let mut state = create_test_state();
        state.add_unit(create_test_warrior(UnitId(1), RED, HexCoord::new(0, 0)));
        state.add_unit(create_test_warrior(UnitId(2), BLUE, HexCoord::new(1, 0)));
        (state, create_test_map(), TileInfo::new(TerrainKind::Plains))
    }

    fn ctx<'a>(state: &'a GameState, map: &'a MapSnapshot, tile: &'a TileInfo) -> ConditionContext<'a> {
        ConditionContext {
            state,
            map,
            subject: state.unit(UnitId(1)).unwrap(),
            opponent: state.unit(UnitId(2)).unwrap(),
            tile,
            combat_type: CombatType::Melee,
        }
    }

    fn melee() -> CombatCondition {
        CombatCondition::combat_type(Restriction::MustBe, CombatType::Melee)
    }

    fn ranged() -> CombatCondition {
        CombatCondition::combat_type(Restriction::MustBe, CombatType::Ranged)
    }

    #[test]
    fn empty_condition_list_always_applies() {
        let (state, map, tile) = fixture();
        let ctx = ctx(&state, &map, &tile);
        assert!(ConditionalModifier::all(0.1, Vec::new()).applies(&ctx));
        assert!(ConditionalModifier::any(0.1, Vec::new()).applies(&ctx));
    }

    #[test]
    fn and_join_needs_every_condition() {
        let (state, map, tile) = fixture();
        let ctx = ctx(&state, &map, &tile);
        assert!(ConditionalModifier::all(0.2, vec![melee(), melee()]).applies(&ctx));
        assert!(!ConditionalModifier::all(0.2, vec![melee(), ranged()]).applies(&ctx));
    }

    #[test]
    fn or_join_needs_any_condition() {
        let (state, map, tile) = fixture();
        let ctx = ctx(&state, &map, &tile);
        assert!(ConditionalModifier::any(0.2, vec![ranged(), melee()]).applies(&ctx));
        assert!(!ConditionalModifier::any(0.2, vec![ranged(), ranged()]).applies(&ctx));
    }

    #[test]
    fn applicable_total_sums_only_matching_magnitudes() {
        let (state, map, tile) = fixture();
        let ctx = ctx(&state, &map, &tile);
        let modifiers = vec![
            ConditionalModifier::unconditional(0.1),
            ConditionalModifier::all(0.25, vec![melee()]),
            ConditionalModifier::all(0.5, vec![ranged()]),
            ConditionalModifier::all(
                -0.3,
                vec![CombatCondition::subject(
                    Restriction::MustBe,
                    UnitCriterion::Wounded,
                )],
            ),
        ];
        assert!((applicable_total(&modifiers, &ctx) - 0.35).abs() < 1e-9);
    }
}
