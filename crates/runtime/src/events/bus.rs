//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{BattleEvent, MovementEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Attack resolutions and rejections
    Battle,
    /// Deferred moves requested by combat
    Movement,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Battle(BattleEvent),
    Movement(MovementEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Battle(_) => Topic::Battle,
            Event::Movement(_) => Topic::Movement,
        }
    }
}

impl From<BattleEvent> for Event {
    fn from(event: BattleEvent) -> Self {
        Event::Battle(event)
    }
}

impl From<MovementEvent> for Event {
    fn from(event: MovementEvent) -> Self {
        Event::Movement(event)
    }
}

struct Channels {
    battle: broadcast::Sender<Event>,
    movement: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Battle => &self.battle,
            Topic::Movement => &self.movement,
        }
    }
}

/// Topic-based event bus
///
/// Every topic gets its own broadcast channel at construction, so publishing
/// and subscribing never need to take a lock. Events are best-effort: a
/// topic without subscribers silently drops them.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Channels {
                battle: broadcast::channel(capacity).0,
                movement: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Only events published after this call are received.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("battle_subscribers", &self.channels.battle.receiver_count())
            .field("movement_subscribers", &self.channels.movement.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warfare_core::{HexCoord, MoveRequest, UnitId};

    fn request() -> MoveRequest {
        MoveRequest {
            unit: UnitId(1),
            from: HexCoord::new(0, 0),
            to: HexCoord::new(1, 0),
            ignore_movement_cost: true,
        }
    }

    #[tokio::test]
    async fn events_only_reach_their_topic() {
        let bus = EventBus::new();
        let mut battle = bus.subscribe(Topic::Battle);
        let mut movement = bus.subscribe(Topic::Movement);

        bus.publish(MovementEvent::Requested(request()));

        assert_eq!(
            movement.recv().await.unwrap(),
            Event::Movement(MovementEvent::Requested(request()))
        );
        assert!(battle.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::with_capacity(4);
        bus.publish(MovementEvent::Requested(request()));

        let receivers = bus.subscribe_multiple(&[Topic::Battle, Topic::Movement]);
        assert_eq!(receivers.len(), 2);
    }
}
