//! Topic-based event bus for runtime events.
//!
//! Combat reports and movement progress are published to separate topics so
//! consumers subscribe only to what they render.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BattleEvent, MovementEvent};
