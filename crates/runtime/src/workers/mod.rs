//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the game state and resolves attacks; the
//! movement worker plays out the deferred advances combat requests and hands
//! them back to the simulation worker for commitment.

mod movement;
mod simulation;

pub use movement::MovementWorker;
pub use simulation::{Command, SimulationWorker};
