//! Worker that plays out deferred moves one at a time.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use warfare_core::MoveRequest;

use super::simulation::Command;
use crate::movement::MovementExecutor;

/// Background task draining the queue of deferred moves.
///
/// Holds only a weak sender to the simulation worker: once every
/// [`crate::RuntimeHandle`] is dropped the simulation worker stops, which
/// closes this worker's queue in turn.
pub struct MovementWorker {
    executor: Arc<dyn MovementExecutor>,
    request_rx: mpsc::Receiver<MoveRequest>,
    command_tx: mpsc::WeakSender<Command>,
}

impl MovementWorker {
    pub fn new(
        executor: Arc<dyn MovementExecutor>,
        request_rx: mpsc::Receiver<MoveRequest>,
        command_tx: mpsc::WeakSender<Command>,
    ) -> Self {
        Self {
            executor,
            request_rx,
            command_tx,
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.request_rx.recv().await {
            let traversal = self.executor.traverse(&request).await;
            if let Err(err) = &traversal {
                warn!(unit = %request.unit, "{err}");
            }

            let Some(command_tx) = self.command_tx.upgrade() else {
                debug!(unit = %request.unit, "simulation worker gone, dropping move");
                break;
            };
            if command_tx
                .send(Command::CompleteMove { request, traversal })
                .await
                .is_err()
            {
                debug!(unit = %request.unit, "simulation worker closed before move completed");
                break;
            }
        }
        debug!("movement worker stopped");
    }
}
