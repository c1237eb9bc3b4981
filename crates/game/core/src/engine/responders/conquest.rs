use crate::combat::{CombatEvent, MoveRequest};
use crate::engine::responder::{Aftermath, PostCombatResponder, ResponderContext};
use crate::state::{GameState, UnitId};

/// A city defeated in melee by a surviving attacker changes hands.
///
/// Every other unit on the city cell is evicted, the city and its facade
/// pass to the attacker's faction, and the attacker is queued to move in.
#[derive(Debug)]
pub struct CityConquestResponder;

impl PostCombatResponder for CityConquestResponder {
    fn name(&self) -> &'static str {
        "city_conquest"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn applies(&self, ctx: &ResponderContext<'_>, state: &GameState) -> bool {
        ctx.is_melee()
            && ctx.defender.is_city()
            && ctx.defender.is_defeated()
            && !ctx.attacker.is_defeated()
            && ctx.defender.city.is_some_and(|id| state.city(id).is_some())
    }

    fn respond(&self, ctx: &ResponderContext<'_>, state: &mut GameState, aftermath: &mut Aftermath) {
        let Some(city) = ctx.defender.city.and_then(|id| state.city(id)) else {
            return;
        };
        let (city_id, facade, location, previous_owner) =
            (city.id, city.facade, city.location, city.owner);
        let conqueror = ctx.attacker.owner;

        let evicted: Vec<UnitId> = state
            .units_at(location)
            .filter(|unit| unit.id != facade)
            .map(|unit| unit.id)
            .collect();
        for id in evicted {
            if let Some(unit) = state.remove_unit(id) {
                aftermath.record(CombatEvent::UnitDestroyed {
                    unit: unit.id,
                    owner: unit.owner,
                    template: unit.template,
                });
            }
        }

        if let Some(city) = state.cities.get_mut(&city_id) {
            city.owner = conqueror;
        }
        if let Some(facade) = state.unit_mut(facade) {
            facade.owner = conqueror;
            facade.can_attack = false;
            facade.fortified_turns = 0;
        }
        aftermath.record(CombatEvent::CityCaptured {
            city: city_id,
            from: previous_owner,
            to: conqueror,
        });

        aftermath.request_move(MoveRequest {
            unit: ctx.attacker.id,
            from: ctx.attacker.location,
            to: location,
            ignore_movement_cost: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatType, DamageDealt};
    use crate::state::{CityId, HexCoord};
    use crate::test_utils::*;

    const ATTACKER: UnitId = UnitId(1);
    const FACADE: UnitId = UnitId(10);
    const CITY_CELL: HexCoord = HexCoord::new(1, 0);

    fn siege_world() -> TestWorld {
        let mut world = TestWorld::new();
        world
            .state
            .add_unit(create_test_warrior(ATTACKER, RED, HexCoord::ORIGIN));
        add_test_city(&mut world.state, CityId(1), BLUE, CITY_CELL, 5, FACADE);
        world
            .state
            .add_unit(create_test_worker(UnitId(11), BLUE, CITY_CELL));
        world
    }

    fn crush() -> DamageDealt {
        DamageDealt {
            to_attacker: 12,
            to_defender: 200,
        }
    }

    #[test]
    fn conquered_city_changes_owner_and_evicts_occupants() {
        let mut world = siege_world();

        let aftermath = run_responder(
            &mut world,
            &CityConquestResponder,
            ATTACKER,
            FACADE,
            CombatType::Melee,
            crush(),
        )
        .unwrap();

        assert_eq!(world.state.city(CityId(1)).unwrap().owner, RED);
        assert_eq!(world.state.unit(FACADE).unwrap().owner, RED);
        assert!(world.state.unit(UnitId(11)).is_none());
        assert!(aftermath.events.iter().any(|e| matches!(
            e,
            CombatEvent::CityCaptured { from, to, .. } if *from == BLUE && *to == RED
        )));
        assert!(aftermath.events.iter().any(|e| matches!(
            e,
            CombatEvent::UnitDestroyed { unit, .. } if *unit == UnitId(11)
        )));
        assert_eq!(aftermath.deferred_move.unwrap().to, CITY_CELL);
    }

    #[test]
    fn ranged_attacks_never_conquer() {
        let mut world = siege_world();
        world
            .state
            .add_unit(create_test_archer(UnitId(3), RED, HexCoord::new(-1, 0)));

        let aftermath = run_responder(
            &mut world,
            &CityConquestResponder,
            UnitId(3),
            FACADE,
            CombatType::Ranged,
            crush(),
        );
        assert!(aftermath.is_none());
        assert_eq!(world.state.city(CityId(1)).unwrap().owner, BLUE);
    }

    #[test]
    fn city_above_zero_hitpoints_holds() {
        let mut world = siege_world();
        let damage = DamageDealt {
            to_attacker: 12,
            to_defender: 150,
        };
        assert!(
            run_responder(
                &mut world,
                &CityConquestResponder,
                ATTACKER,
                FACADE,
                CombatType::Melee,
                damage,
            )
            .is_none()
        );
    }

    #[test]
    fn fallen_attacker_cannot_take_the_city() {
        let mut world = siege_world();
        let damage = DamageDealt {
            to_attacker: 100,
            to_defender: 200,
        };
        assert!(
            run_responder(
                &mut world,
                &CityConquestResponder,
                ATTACKER,
                FACADE,
                CombatType::Melee,
                damage,
            )
            .is_none()
        );
    }
}
