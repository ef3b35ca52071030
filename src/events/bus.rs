//! Event Bus - fire-and-forget channel from the match core to presentation
//!
//! Core systems emit events; audio, VFX and UI drain them. A disabled bus
//! drops everything, which must never change match behavior.

use bevy::prelude::*;

use super::types::GameEvent;

/// Event stamped with wall-clock milliseconds since app start
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    pub time_ms: u32,
    pub event: GameEvent,
}

#[derive(Resource, Debug, Default)]
pub struct EventBus {
    queue: Vec<BusEvent>,
    now_ms: u32,
    enabled: bool,
    emitted: u64,
    dropped: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// A bus with no listener: every emit is counted and discarded
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn set_clock(&mut self, elapsed_secs: f32) {
        self.now_ms = (elapsed_secs * 1000.0) as u32;
    }

    pub fn emit(&mut self, event: GameEvent) {
        if !self.enabled {
            self.dropped += 1;
            return;
        }
        trace!("{} @{}ms", event.name(), self.now_ms);
        self.emitted += 1;
        self.queue.push(BusEvent {
            time_ms: self.now_ms,
            event,
        });
    }

    /// Events not yet drained
    pub fn peek(&self) -> &[BusEvent] {
        &self.queue
    }

    /// Hand every queued event to the caller
    pub fn drain(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the bus off also discards anything still queued
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.dropped += self.queue.len() as u64;
            self.queue.clear();
        }
    }

    /// (emitted, dropped) since creation
    pub fn totals(&self) -> (u64, u64) {
        (self.emitted, self.dropped)
    }
}

/// Emit to the bus if one is installed.
/// Systems take `Option<ResMut<EventBus>>` so a missing presentation layer is harmless.
pub fn notify(bus: &mut Option<ResMut<EventBus>>, event: GameEvent) {
    if let Some(bus) = bus.as_mut() {
        bus.emit(event);
    }
}

/// Stamp the bus with the current wall-clock time
pub fn update_event_bus_time(mut bus: ResMut<EventBus>, time: Res<Time<Real>>) {
    bus.set_clock(time.elapsed_secs());
}
