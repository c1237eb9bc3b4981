use crate::combat::CombatEvent;
use crate::engine::responder::{
    Aftermath, CombatantSnapshot, PostCombatResponder, ResponderContext,
};
use crate::state::GameState;

/// Gold raiding on melee hits against cities, and bounties for kills.
///
/// Raids move a fraction of the damage dealt from the city owner to the
/// attacker's owner. A bounty is minted for the survivor's owner whenever
/// exactly one non-city combatant was defeated and not captured.
#[derive(Debug)]
pub struct PlunderResponder;

impl PlunderResponder {
    fn raids(ctx: &ResponderContext<'_>) -> bool {
        ctx.is_melee() && ctx.defender.is_city() && ctx.results.damage_to_defender > 0
    }

    fn earns_bounty(ctx: &ResponderContext<'_>, state: &GameState) -> bool {
        let loser = match (ctx.attacker.is_defeated(), ctx.defender.is_defeated()) {
            (false, true) => &ctx.defender,
            (true, false) => &ctx.attacker,
            _ => return false,
        };
        !loser.is_city() && !Self::changed_hands(loser, state)
    }

    /// A captured unit survives under its new owner.
    fn changed_hands(loser: &CombatantSnapshot, state: &GameState) -> bool {
        state
            .unit(loser.id)
            .is_some_and(|unit| unit.owner != loser.owner)
    }
}

impl PostCombatResponder for PlunderResponder {
    fn name(&self) -> &'static str {
        "plunder"
    }

    fn applies(&self, ctx: &ResponderContext<'_>, state: &GameState) -> bool {
        Self::raids(ctx) || Self::earns_bounty(ctx, state)
    }

    fn respond(&self, ctx: &ResponderContext<'_>, state: &mut GameState, aftermath: &mut Aftermath) {
        let tables = ctx.env.tables();
        let bounty = Self::earns_bounty(ctx, state);

        if Self::raids(ctx) {
            let amount =
                (f64::from(ctx.results.damage_to_defender) * tables.raid_fraction()).floor() as u32;
            let (from, to) = (ctx.defender.owner, ctx.attacker.owner);
            let gold = state.transfer_gold(from, to, amount);
            if gold > 0 {
                aftermath.record(CombatEvent::GoldRaided { from, to, gold });
            }
        }

        if bounty {
            let (winner, loser) = if ctx.defender.is_defeated() {
                (&ctx.attacker, &ctx.defender)
            } else {
                (&ctx.defender, &ctx.attacker)
            };
            let cost = ctx.env.templates().production_cost(loser.template).unwrap_or(0);
            let amount = (f64::from(cost)
                * tables.bounty_fraction()
                * tables.bounty_modifier(winner.owner))
            .floor()
            .max(0.0) as u32;
            let gold = state.grant_gold(winner.owner, amount);
            if gold > 0 {
                aftermath.record(CombatEvent::BountyAwarded {
                    faction: winner.owner,
                    victim: loser.id,
                    gold,
                });
            }
        }
    }
}
