use crate::combat::CombatEvent;
use crate::engine::responder::{Aftermath, PostCombatResponder, ResponderContext};
use crate::state::GameState;

/// Raiders who defeat a city in melee steal its share of the owner's gold.
///
/// The share is the city's population over the owner's total city
/// population. Runs before conquest so the share is taken from the
/// pre-conquest owner.
#[derive(Debug)]
pub struct CitySackResponder;

impl PostCombatResponder for CitySackResponder {
    fn name(&self) -> &'static str {
        "city_sack"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn applies(&self, ctx: &ResponderContext<'_>, state: &GameState) -> bool {
        ctx.env.tables().sack_enabled()
            && ctx.is_melee()
            && ctx.defender.is_city()
            && ctx.defender.is_defeated()
            && ctx.defender.city.is_some()
            && state
                .faction(ctx.attacker.owner)
                .is_some_and(|faction| faction.barbaric)
    }

    fn respond(&self, ctx: &ResponderContext<'_>, state: &mut GameState, aftermath: &mut Aftermath) {
        let Some(city) = ctx.defender.city.and_then(|id| state.city(id)) else {
            return;
        };
        let city_id = city.id;
        let victim = ctx.defender.owner;
        let population = u64::from(city.population);
        let total = u64::from(state.total_city_population(victim));
        let stockpile = state.faction(victim).map_or(0, |f| f.gold);
        if total == 0 || stockpile == 0 {
            return;
        }

        // Integer floor of stockpile * population / total.
        let share = (u64::from(stockpile) * population / total).min(u64::from(stockpile)) as u32;
        let stolen = state.transfer_gold(victim, ctx.attacker.owner, share);
        if stolen > 0 {
            aftermath.record(CombatEvent::CitySacked {
                city: city_id,
                from: victim,
                to: ctx.attacker.owner,
                gold: stolen,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatType, DamageDealt};
    use crate::state::{CityId, HexCoord, UnitId};
    use crate::test_utils::*;

    const RAIDER: UnitId = UnitId(1);
    const FACADE: UnitId = UnitId(10);

    fn raid_world() -> TestWorld {
        let mut world = TestWorld::new();
        world.state.faction_mut(RED).unwrap().barbaric = true;
        world
            .state
            .add_unit(create_test_warrior(RAIDER, RED, HexCoord::ORIGIN));
        add_test_city(&mut world.state, CityId(1), BLUE, HexCoord::new(1, 0), 4, FACADE);
        add_test_city(&mut world.state, CityId(2), BLUE, HexCoord::new(4, 0), 6, UnitId(11));
        world
    }

    fn crush() -> DamageDealt {
        DamageDealt {
            to_attacker: 0,
            to_defender: 200,
        }
    }

    #[test]
    fn sack_steals_the_population_share() {
        let mut world = raid_world();

        let aftermath = run_responder(
            &mut world,
            &CitySackResponder,
            RAIDER,
            FACADE,
            CombatType::Melee,
            crush(),
        )
        .unwrap();

        assert_eq!(world.state.faction(BLUE).unwrap().gold, 60);
        assert_eq!(world.state.faction(RED).unwrap().gold, 140);
        assert!(matches!(
            aftermath.events.as_slice(),
            [CombatEvent::CitySacked { gold: 40, .. }]
        ));
    }

    #[test]
    fn share_is_floored() {
        let mut world = raid_world();
        world.state.faction_mut(BLUE).unwrap().gold = 99;

        run_responder(
            &mut world,
            &CitySackResponder,
            RAIDER,
            FACADE,
            CombatType::Melee,
            crush(),
        )
        .unwrap();
        // floor(99 * 4 / 10) = 39
        assert_eq!(world.state.faction(BLUE).unwrap().gold, 60);
    }

    #[test]
    fn civilised_attackers_do_not_sack() {
        let mut world = raid_world();
        world.state.faction_mut(RED).unwrap().barbaric = false;

        let aftermath = run_responder(
            &mut world,
            &CitySackResponder,
            RAIDER,
            FACADE,
            CombatType::Melee,
            crush(),
        );
        assert!(aftermath.is_none());
        assert_eq!(world.state.faction(BLUE).unwrap().gold, 100);
    }

    #[test]
    fn sacking_can_be_switched_off() {
        let mut world = raid_world();
        world.tables.sack_enabled = false;

        assert!(
            run_responder(
                &mut world,
                &CitySackResponder,
                RAIDER,
                FACADE,
                CombatType::Melee,
                crush(),
            )
            .is_none()
        );
    }

    #[test]
    fn surviving_city_is_not_sacked() {
        let mut world = raid_world();
        let damage = DamageDealt {
            to_attacker: 0,
            to_defender: 50,
        };
        let aftermath = run_responder(
            &mut world,
            &CitySackResponder,
            RAIDER,
            FACADE,
            CombatType::Melee,
            damage,
        );
        assert!(aftermath.is_none());
    }

    #[test]
    fn empty_treasury_yields_nothing() {
        let mut world = raid_world();
        world.state.faction_mut(BLUE).unwrap().gold = 0;

        let aftermath = run_responder(
            &mut world,
            &CitySackResponder,
            RAIDER,
            FACADE,
            CombatType::Melee,
            crush(),
        )
        .unwrap();
        assert!(aftermath.events.is_empty());
        assert_eq!(world.state.faction(RED).unwrap().gold, 100);
    }
}
