use crate::engine::responder::{Aftermath, PostCombatResponder, ResponderContext};
use crate::state::{CombatFlags, GameState};

/// Spends the surviving attacker's movement for the attack.
///
/// Without the move-after-attacking flag movement is zeroed. Otherwise a
/// melee attack costs the traversal into the defender's cell and a ranged
/// attack costs one point.
#[derive(Debug)]
pub struct ForcedMovementResponder;

impl PostCombatResponder for ForcedMovementResponder {
    fn name(&self) -> &'static str {
        "forced_movement"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn applies(&self, ctx: &ResponderContext<'_>, state: &GameState) -> bool {
        state.unit(ctx.attacker.id).is_some()
    }

    fn respond(&self, ctx: &ResponderContext<'_>, state: &mut GameState, _aftermath: &mut Aftermath) {
        let cost = if !ctx.info.has(CombatFlags::CAN_MOVE_AFTER_ATTACKING) {
            None
        } else if ctx.is_melee() {
            Some(
                ctx.env
                    .map()
                    .movement_cost(ctx.attacker.location, ctx.defender.location),
            )
        } else {
            Some(1)
        };

        if let Some(attacker) = state.unit_mut(ctx.attacker.id) {
            match cost {
                Some(cost) => attacker.movement.drain(cost),
                None => attacker.movement.current = 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatType, DamageDealt};
    use crate::env::{ShapeKind, TerrainKind, TileInfo};
    use crate::state::{HexCoord, UnitId};
    use crate::test_utils::*;

    const ATTACKER: UnitId = UnitId(1);
    const DEFENDER: UnitId = UnitId(2);

    fn skirmish(mover: bool) -> TestWorld {
        let mut world = TestWorld::new();
        let mut attacker =
            create_test_warrior(ATTACKER, RED, HexCoord::ORIGIN).with_movement(3, 3);
        if mover {
            attacker.summary.flags |= CombatFlags::CAN_MOVE_AFTER_ATTACKING;
        }
        world.state.add_unit(attacker);
        world
            .state
            .add_unit(create_test_warrior(DEFENDER, BLUE, HexCoord::new(1, 0)));
        world
    }

    fn scratch() -> DamageDealt {
        DamageDealt {
            to_attacker: 10,
            to_defender: 10,
        }
    }

    fn movement_left(world: &TestWorld) -> u32 {
        world.state.unit(ATTACKER).unwrap().movement.current
    }

    #[test]
    fn attacking_ends_movement_by_default() {
        let mut world = skirmish(false);
        run_responder(
            &mut world,
            &ForcedMovementResponder,
            ATTACKER,
            DEFENDER,
            CombatType::Melee,
            scratch(),
        )
        .unwrap();
        assert_eq!(movement_left(&world), 0);
    }

    #[test]
    fn melee_movers_pay_the_traversal_cost() {
        let mut world = skirmish(true);
        world.map.set_tile(
            HexCoord::new(1, 0),
            TileInfo::new(TerrainKind::Plains).with_shape(ShapeKind::Hills),
        );
        run_responder(
            &mut world,
            &ForcedMovementResponder,
            ATTACKER,
            DEFENDER,
            CombatType::Melee,
            scratch(),
        )
        .unwrap();
        assert_eq!(movement_left(&world), 1);
    }

    #[test]
    fn ranged_movers_pay_one_point_floored_at_zero() {
        let mut world = skirmish(true);
        run_responder(
            &mut world,
            &ForcedMovementResponder,
            ATTACKER,
            DEFENDER,
            CombatType::Ranged,
            scratch(),
        )
        .unwrap();
        assert_eq!(movement_left(&world), 2);

        world.state.unit_mut(ATTACKER).unwrap().movement.current = 0;
        run_responder(
            &mut world,
            &ForcedMovementResponder,
            ATTACKER,
            DEFENDER,
            CombatType::Ranged,
            DamageDealt::default(),
        )
        .unwrap();
        assert_eq!(movement_left(&world), 0);
    }
}
