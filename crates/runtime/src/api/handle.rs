//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! resolving attacks or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use warfare_core::{CombatOutcome, CombatPreview, CombatType, GameState, UnitId};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        command: Command,
        reply_rx: oneshot::Receiver<T>,
    ) -> Result<T> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Resolve an attack and commit every combat effect.
    ///
    /// Returns once the outcome is committed; a deferred advance may still be
    /// in flight (watch [`Topic::Movement`]).
    pub async fn attack(
        &self,
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
    ) -> Result<CombatOutcome> {
        let (reply, reply_rx) = oneshot::channel();
        let command = Command::Attack {
            attacker,
            defender,
            combat_type,
            reply,
        };
        Ok(self.request(command, reply_rx).await??)
    }

    pub async fn melee_attack(&self, attacker: UnitId, defender: UnitId) -> Result<CombatOutcome> {
        self.attack(attacker, defender, CombatType::Melee).await
    }

    pub async fn ranged_attack(&self, attacker: UnitId, defender: UnitId) -> Result<CombatOutcome> {
        self.attack(attacker, defender, CombatType::Ranged).await
    }

    /// Run the validity rules for an attack against the current state.
    pub async fn check_attack(
        &self,
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
    ) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        let command = Command::CheckAttack {
            attacker,
            defender,
            combat_type,
            reply,
        };
        Ok(self.request(command, reply_rx).await??)
    }

    /// Whether the attack would currently be accepted.
    pub async fn can_attack(
        &self,
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
    ) -> Result<bool> {
        match self.check_attack(attacker, defender, combat_type).await {
            Ok(()) => Ok(true),
            Err(RuntimeError::Combat(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Estimate an attack without validating or committing it.
    pub async fn preview(
        &self,
        attacker: UnitId,
        defender: UnitId,
        combat_type: CombatType,
    ) -> Result<CombatPreview> {
        let (reply, reply_rx) = oneshot::channel();
        let command = Command::Preview {
            attacker,
            defender,
            combat_type,
            reply,
        };
        Ok(self.request(command, reply_rx).await??)
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        let (reply, reply_rx) = oneshot::channel();
        self.request(Command::QueryState { reply }, reply_rx).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - Attack resolutions and rejections
    /// - `Topic::Movement` - Deferred advances and their completion
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use warfare_runtime::Topic;
    ///
    /// let mut battle_rx = handle.subscribe(Topic::Battle);
    /// while let Ok(event) = battle_rx.recv().await {
    ///     // Render the battle report
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
