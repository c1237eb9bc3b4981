//! Simulation worker that owns the authoritative [`warfare_core::GameState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], resolves attacks through
//! [`warfare_core::CombatEngine`], publishes reports to the [`EventBus`], and
//! forwards deferred moves to the movement worker.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use warfare_core::{
    CombatEngine, CombatError, CombatOutcome, CombatPreview, CombatType, GameState, MoveRequest,
    ResponderChain, UnitId,
};

use crate::events::{BattleEvent, EventBus, MovementEvent};
use crate::movement::MovementAborted;
use crate::oracle::OracleManager;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Resolve an attack and commit its effects.
    Attack {
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
        reply: oneshot::Sender<Result<CombatOutcome, CombatError>>,
    },
    /// Run the validity rules without touching state.
    CheckAttack {
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
        reply: oneshot::Sender<Result<(), CombatError>>,
    },
    /// Estimate an attack without validating or committing it.
    Preview {
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
        reply: oneshot::Sender<Result<CombatPreview, CombatError>>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// A deferred move finished (or gave up) on the movement worker.
    CompleteMove {
        request: MoveRequest,
        traversal: Result<(), MovementAborted>,
    },
}

/// Background task that processes combat commands.
///
/// Commands are handled strictly one at a time, so every attack sees the
/// fully committed result of the previous one.
pub struct SimulationWorker {
    state: GameState,
    oracles: OracleManager,
    responders: ResponderChain,
    command_rx: mpsc::Receiver<Command>,
    movement_tx: mpsc::Sender<MoveRequest>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(
        state: GameState,
        oracles: OracleManager,
        responders: ResponderChain,
        command_rx: mpsc::Receiver<Command>,
        movement_tx: mpsc::Sender<MoveRequest>,
        event_bus: EventBus,
    ) -> Self {
        let names: Vec<_> = responders.names().collect();
        info!(
            units = state.units.len(),
            factions = state.factions.len(),
            cities = state.cities.len(),
            responders = ?names,
            "SimulationWorker initialized"
        );

        Self {
            state,
            oracles,
            responders,
            command_rx,
            movement_tx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("simulation worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Attack {
                attacker,
                defender,
                combat_type,
                reply,
            } => {
                let result = self.handle_attack(attacker, defender, combat_type);
                if reply.send(result).is_err() {
                    debug!("Attack reply channel closed (caller dropped)");
                }
            }
            Command::CheckAttack {
                attacker,
                defender,
                combat_type,
                reply,
            } => {
                let engine = CombatEngine::with_responders(&mut self.state, self.responders.clone());
                let env = self.oracles.as_game_env();
                let result = match combat_type {
                    CombatType::Melee => engine.check_melee_attack(env, attacker, defender),
                    CombatType::Ranged => engine.check_ranged_attack(env, attacker, defender),
                };
                if reply.send(result).is_err() {
                    debug!("CheckAttack reply channel closed (caller dropped)");
                }
            }
            Command::Preview {
                attacker,
                defender,
                combat_type,
                reply,
            } => {
                let engine = CombatEngine::with_responders(&mut self.state, self.responders.clone());
                let result =
                    engine.preview(self.oracles.as_game_env(), attacker, defender, combat_type);
                if reply.send(result).is_err() {
                    debug!("Preview reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::CompleteMove { request, traversal } => {
                self.handle_move_completion(request, traversal);
            }
        }
    }

    /// Resolves one attack and publishes its report.
    ///
    /// The battle report goes out before the deferred move is scheduled, so
    /// subscribers always observe combat effects ahead of any advance.
    fn handle_attack(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
    ) -> Result<CombatOutcome, CombatError> {
        debug!(%attacker, %defender, %combat_type, "resolving attack");

        let env = self.oracles.as_game_env();
        let mut engine = CombatEngine::with_responders(&mut self.state, self.responders.clone());
        let result = match combat_type {
            CombatType::Melee => engine.perform_melee_attack(env, attacker, defender),
            CombatType::Ranged => engine.perform_ranged_attack(env, attacker, defender),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%attacker, %defender, %combat_type, %error, "attack rejected");
                self.event_bus.publish(BattleEvent::Rejected {
                    attacker,
                    defender,
                    combat_type,
                    error: error.clone(),
                });
                return Err(error);
            }
        };

        let results = &outcome.results;
        info!(
            %attacker,
            %defender,
            %combat_type,
            damage_to_attacker = results.damage_to_attacker,
            damage_to_defender = results.damage_to_defender,
            events = outcome.events.len(),
            "attack resolved"
        );
        for event in &outcome.events {
            debug!(?event, "combat effect");
        }

        self.event_bus.publish(BattleEvent::Resolved {
            outcome: Box::new(outcome.clone()),
        });
        if let Some(request) = outcome.deferred_move {
            self.schedule_move(request);
        }

        Ok(outcome)
    }

    fn schedule_move(&self, request: MoveRequest) {
        self.event_bus.publish(MovementEvent::Requested(request));
        if let Err(err) = self.movement_tx.try_send(request) {
            // Dropping an advance never changes what combat already committed.
            let reason = match err {
                mpsc::error::TrySendError::Full(_) => "movement queue full",
                mpsc::error::TrySendError::Closed(_) => "movement worker stopped",
            };
            warn!(unit = %request.unit, reason, "deferred move dropped");
            self.event_bus.publish(MovementEvent::Aborted {
                request,
                reason: reason.to_string(),
            });
        }
    }

    /// Commits a finished traversal. Failures are reported, never rolled back.
    fn handle_move_completion(
        &mut self,
        request: MoveRequest,
        traversal: Result<(), MovementAborted>,
    ) {
        if let Err(aborted) = traversal {
            self.event_bus.publish(MovementEvent::Aborted {
                request,
                reason: aborted.reason,
            });
            return;
        }

        match self
            .state
            .relocate_unit(request.unit, request.from, request.to)
        {
            Ok(()) => {
                debug!(unit = %request.unit, from = %request.from, to = %request.to, "advance completed");
                self.event_bus.publish(MovementEvent::Completed {
                    unit: request.unit,
                    from: request.from,
                    to: request.to,
                });
            }
            Err(reason) => {
                warn!(unit = %request.unit, %reason, "advance failed");
                self.event_bus
                    .publish(MovementEvent::Failed { request, reason });
            }
        }
    }
}
