// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pub/sub broadcast channel named (but not specified) in `spec.md` §6.
//!
//! A thin wrapper over `tokio::sync::broadcast`: every registered
//! container's forwarded events ride one bus, and any number of `monitor`
//! subscribers can drain it independently without slowing the registry down.

use corral_core::BroadcastEvent;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 1024;

/// Cloneable handle to the daemon-wide broadcast bus.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BroadcastEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event. Best-effort: if no subscriber is listening, the
    /// event is dropped rather than buffered forever.
    pub fn publish(&self, event: BroadcastEvent) {
        let _ = self.tx.send(event);
    }

    /// Subscribe to the bus. Lagging subscribers skip ahead rather than
    /// block the publisher — a `monitor` client that falls behind sees a
    /// `Lagged` error on its next `recv()` and can resubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
