//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive combat.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use warfare_core::{GameState, ResponderChain};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::movement::{DelayedMovement, MovementExecutor};
use crate::oracle::OracleManager;
use crate::workers::{MovementWorker, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Deferred moves queued beyond this are dropped.
    pub movement_buffer_size: usize,
    /// Per-cell traversal delay of the default [`DelayedMovement`].
    pub movement_step_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            movement_buffer_size: 16,
            movement_step_delay: Duration::ZERO,
        }
    }
}

/// Main runtime that orchestrates combat resolution
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
    movement_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Workers stop once every outstanding handle clone has been dropped;
    /// moves still queued at that point are discarded.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.movement_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    oracles: Option<OracleManager>,
    responders: Option<ResponderChain>,
    movement: Option<Arc<dyn MovementExecutor>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            oracles: None,
            responders: None,
            movement: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Replace the post-combat responder chain.
    ///
    /// If not provided, [`ResponderChain::standard`] is used.
    pub fn responders(mut self, responders: ResponderChain) -> Self {
        self.responders = Some(responders);
        self
    }

    /// Replace how deferred moves are played out.
    ///
    /// Defaults to a [`DelayedMovement`] using `movement_step_delay`.
    pub fn movement(mut self, executor: impl MovementExecutor + 'static) -> Self {
        self.movement = Some(Arc::new(executor));
        self
    }

    /// Build the runtime and spawn its workers.
    pub async fn build(self) -> Result<Runtime> {
        let state = self.state.ok_or(RuntimeError::MissingState)?;
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let responders = self.responders.unwrap_or_default();
        let movement: Arc<dyn MovementExecutor> = match self.movement {
            Some(executor) => executor,
            None => Arc::new(DelayedMovement::new(self.config.movement_step_delay)),
        };

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let (movement_tx, movement_rx) = mpsc::channel(self.config.movement_buffer_size);

        let movement_worker = MovementWorker::new(movement, movement_rx, command_tx.downgrade());
        let sim_worker = SimulationWorker::new(
            state,
            oracles,
            responders,
            command_rx,
            movement_tx,
            event_bus.clone(),
        );

        let sim_worker_handle = tokio::spawn(sim_worker.run());
        let movement_worker_handle = tokio::spawn(movement_worker.run());

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            sim_worker_handle,
            movement_worker_handle,
        })
    }
}
