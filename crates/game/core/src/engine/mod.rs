//! Attack validation and execution pipeline.
//!
//! The [`CombatEngine`] is the only component that mutates [`GameState`] in
//! response to an attack. It validates the request, builds the
//! [`CombatInfo`], applies damage, and then drives the responder chain.
//! Everything up to the returned [`CombatOutcome`] is synchronous; the
//! optional deferred move inside it is for the caller to schedule.

mod errors;
mod responder;
pub mod responders;
mod validation;

pub use errors::{AttackRejection, CombatError};
pub use responder::{
    Aftermath, CombatantSnapshot, PostCombatResponder, ResponderChain, ResponderContext,
};

use crate::combat::info::build_info;
use crate::combat::{
    CombatInfo, CombatOutcome, CombatType, DamageDealt, UnitCombatResults, calculate_damage,
    effective_strengths,
};
use crate::env::GameEnv;
use crate::state::{CombatFlags, GameState, UnitId};

/// Side-effect free estimate of an attack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatPreview {
    pub info: CombatInfo,
    pub damage: DamageDealt,
    pub attacker_strength: f64,
    pub defender_strength: f64,
}

/// Combat engine bound to one game state.
pub struct CombatEngine<'a> {
    state: &'a mut GameState,
    responders: ResponderChain,
}

impl<'a> CombatEngine<'a> {
    /// Creates an engine running the standard responder chain.
    pub fn new(state: &'a mut GameState) -> Self {
        Self::with_responders(state, ResponderChain::standard())
    }

    pub fn with_responders(state: &'a mut GameState, responders: ResponderChain) -> Self {
        Self { state, responders }
    }

    pub fn state(&self) -> &GameState {
        &*self.state
    }

    pub fn check_melee_attack(
        &self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
    ) -> Result<(), CombatError> {
        self.check(env, attacker, defender, CombatType::Melee)
    }

    pub fn check_ranged_attack(
        &self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
    ) -> Result<(), CombatError> {
        self.check(env, attacker, defender, CombatType::Ranged)
    }

    pub fn can_perform_melee_attack(
        &self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
    ) -> bool {
        self.check_melee_attack(env, attacker, defender).is_ok()
    }

    pub fn can_perform_ranged_attack(
        &self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
    ) -> bool {
        self.check_ranged_attack(env, attacker, defender).is_ok()
    }

    pub fn perform_melee_attack(
        &mut self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
    ) -> Result<CombatOutcome, CombatError> {
        self.perform(env, attacker, defender, CombatType::Melee)
    }

    pub fn perform_ranged_attack(
        &mut self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
    ) -> Result<CombatOutcome, CombatError> {
        self.perform(env, attacker, defender, CombatType::Ranged)
    }

    /// Computes modifiers and damage without validating or mutating anything.
    pub fn preview(
        &self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
    ) -> Result<CombatPreview, CombatError> {
        let engagement = validation::resolve(self.state, &env, attacker, defender)?;
        let info = build_info(
            self.state,
            env,
            engagement.attacker,
            engagement.defender,
            &engagement.tile,
            combat_type,
        );
        let damage = calculate_damage(
            engagement.attacker,
            engagement.defender,
            &info,
            env.tables().base_damage(),
        );
        let (attacker_strength, defender_strength) =
            effective_strengths(engagement.attacker, engagement.defender, &info);
        Ok(CombatPreview {
            info,
            damage,
            attacker_strength,
            defender_strength,
        })
    }

    fn check(
        &self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
    ) -> Result<(), CombatError> {
        let engagement = validation::resolve(self.state, &env, attacker, defender)?;
        validation::check(self.state, &env, &engagement, combat_type)
            .map_err(|reason| CombatError::precondition(combat_type, reason))
    }

    fn perform(
        &mut self,
        env: GameEnv<'_>,
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
    ) -> Result<CombatOutcome, CombatError> {
        let (info, damage) = {
            let engagement = validation::resolve(self.state, &env, attacker, defender)?;
            validation::check(self.state, &env, &engagement, combat_type)
                .map_err(|reason| CombatError::precondition(combat_type, reason))?;
            let info = build_info(
                self.state,
                env,
                engagement.attacker,
                engagement.defender,
                &engagement.tile,
                combat_type,
            );
            let damage = calculate_damage(
                engagement.attacker,
                engagement.defender,
                &info,
                env.tables().base_damage(),
            );
            (info, damage)
        };

        let attacker_snapshot = self.apply_damage(attacker, damage.to_attacker)?;
        let defender_snapshot = self.apply_damage(defender, damage.to_defender)?;

        let results = UnitCombatResults {
            attacker,
            defender,
            damage_to_attacker: damage.to_attacker,
            damage_to_defender: damage.to_defender,
            info,
        };

        let mut aftermath = Aftermath::default();
        {
            let ctx = ResponderContext {
                env,
                info: &results.info,
                results: &results,
                attacker: attacker_snapshot,
                defender: defender_snapshot,
            };
            self.responders.run(&ctx, self.state, &mut aftermath);
        }

        if let Some(unit) = self.state.unit_mut(attacker) {
            unit.can_attack = results.info.has(CombatFlags::CAN_ATTACK_AFTER_ATTACKING);
        }

        Ok(CombatOutcome {
            results,
            events: aftermath.events,
            deferred_move: aftermath.deferred_move,
        })
    }

    /// Subtracts hitpoints and snapshots the unit as it now stands.
    fn apply_damage(&mut self, id: UnitId, amount: u32) -> Result<CombatantSnapshot, CombatError> {
        let unit = self.state.unit_mut(id).ok_or(CombatError::UnitNotFound(id))?;
        unit.hitpoints.drain(amount);
        let unit = self.state.unit(id).ok_or(CombatError::UnitNotFound(id))?;
        Ok(CombatantSnapshot::capture(self.state, unit))
    }
}
