//! Asynchronous abstraction for playing out deferred moves.
//!
//! Combat only *requests* that a victorious attacker advance; how long the
//! traversal takes (an animation, a network round trip, nothing at all) is up
//! to the [`MovementExecutor`] plugged into the runtime. The state change is
//! committed by the simulation worker once the executor reports arrival.
use std::time::Duration;

use async_trait::async_trait;
use warfare_core::{MoveRequest, UnitId};

/// The traversal was abandoned before the unit reached its target.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("movement of {unit} was aborted: {reason}")]
pub struct MovementAborted {
    pub unit: UnitId,
    pub reason: String,
}

/// Trait for playing out a single deferred move.
///
/// Implementations must not touch game state; they only decide when (and
/// whether) the move finishes.
#[async_trait]
pub trait MovementExecutor: Send + Sync {
    async fn traverse(&self, request: &MoveRequest) -> Result<(), MovementAborted>;
}

/// Waits a fixed delay per cell travelled.
#[derive(Clone, Copy, Debug)]
pub struct DelayedMovement {
    step_delay: Duration,
}

impl DelayedMovement {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    /// Completes moves on the next scheduler tick.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for DelayedMovement {
    fn default() -> Self {
        Self::instant()
    }
}

#[async_trait]
impl MovementExecutor for DelayedMovement {
    async fn traverse(&self, request: &MoveRequest) -> Result<(), MovementAborted> {
        let steps = request.from.distance(request.to).max(1);
        if self.step_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.step_delay * steps).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warfare_core::HexCoord;

    #[tokio::test(start_paused = true)]
    async fn delay_scales_with_distance() {
        let movement = DelayedMovement::new(Duration::from_millis(50));
        let request = MoveRequest {
            unit: UnitId(3),
            from: HexCoord::new(0, 0),
            to: HexCoord::new(1, 0),
            ignore_movement_cost: true,
        };

        let started = tokio::time::Instant::now();
        movement.traverse(&request).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
