//! Presentation events
//!
//! The match core publishes named events (goals, kicks, abilities, possession)
//! through the EventBus. Consumers are optional: audio, VFX and UI read them,
//! the core never reads them back.

mod bus;
mod types;

pub use bus::{BusEvent, EventBus, notify, update_event_bus_time};
pub use types::{GameEvent, PlayerId};
