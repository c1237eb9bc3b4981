//! Async orchestration around the deterministic combat core.
//!
//! The runtime owns the authoritative [`warfare_core::GameState`] inside a
//! simulation worker, serialises every attack through it, publishes combat
//! reports on a topic-based event bus, and completes the deferred moves
//! combat requests on a separate movement worker. Consumers drive it through
//! the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`movement`] defines how deferred moves are played out
//! - [`oracle`] bundles the read-only combat collaborators
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod movement;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{BattleEvent, Event, EventBus, MovementEvent, Topic};
pub use movement::{DelayedMovement, MovementAborted, MovementExecutor};
pub use oracle::OracleManager;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
