// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The container registry: id → lifecycle engine, plus the glue that
//! forwards engine events to the event bus and self-evicts terminal
//! containers. Grounded on `spec.md` §4.3/§9 ("registry self-eviction") and
//! the teacher's `crates/daemon/src/engine/mod.rs` mailbox-ownership shape.

use std::collections::HashMap;
use std::sync::Arc;

use corral_core::{BroadcastEvent, ContainerId, EngineError, EngineEvent, State, StableState};
use corral_engine::engine::{spawn, EngineHandle, Snapshot};
use corral_engine::interior::{InteriorFactory, Monitor};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::info;

use crate::event_bus::EventBus;

/// Owns every live container engine and the factories that can construct
/// new ones. Cheap to clone — the engine map is behind an `Arc<Mutex<_>>`.
#[derive(Clone)]
pub struct Registry {
    engines: Arc<Mutex<HashMap<ContainerId, EngineHandle>>>,
    factories: Arc<HashMap<&'static str, Arc<dyn InteriorFactory>>>,
    bus: EventBus,
}

/// Constructs a [`Registry`] with a fixed set of interior factories,
/// keyed by [`InteriorFactory::kind`].
pub struct RegistryBuilder {
    factories: HashMap<&'static str, Arc<dyn InteriorFactory>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self { factories: HashMap::new() }
    }

    pub fn with_factory(mut self, factory: Arc<dyn InteriorFactory>) -> Self {
        self.factories.insert(factory.kind(), factory);
        self
    }

    pub fn build(self, bus: EventBus) -> Registry {
        Registry { engines: Arc::new(Mutex::new(HashMap::new())), factories: Arc::new(self.factories), bus }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// `container.create` — constructs the interior, spawns its engine at
    /// `offline`, and immediately begins loading it toward `stopped`.
    /// Returns once registration succeeds, not once the engine settles
    /// (per `spec.md` §4.3).
    pub fn create(&self, id: ContainerId, conf: Value) -> Result<(), EngineError> {
        let mut engines = self.engines.lock();
        if engines.contains_key(&id) {
            return Err(EngineError::Conflict { id });
        }

        let kind = conf.get("kind").and_then(Value::as_str).ok_or_else(|| EngineError::InvalidConfig {
            id: id.clone(),
            reason: "conf is missing a `kind` field".into(),
        })?;
        let factory = self.factories.get(kind).ok_or_else(|| EngineError::InvalidConfig {
            id: id.clone(),
            reason: format!("unknown interior kind `{kind}`"),
        })?;

        let (monitor_tx, monitor_rx) = mpsc::unbounded_channel();
        let interior = factory
            .create(&id, &conf, Monitor::new(monitor_tx))
            .map_err(|reason| EngineError::InvalidConfig { id: id.clone(), reason })?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let handle = spawn(id.clone(), interior, monitor_rx, events_tx);
        handle.set_state(StableState::Stopped, false);
        engines.insert(id.clone(), handle);
        drop(engines);

        self.spawn_forwarder(id, events_rx);
        Ok(())
    }

    /// `container.start` — no-op if already at or heading to `running`.
    pub fn start(&self, id: &ContainerId) -> Result<(), EngineError> {
        self.with_handle(id, |handle| handle.set_state(StableState::Running, false))
    }

    /// `container.stop`.
    pub fn stop(&self, id: &ContainerId, force: bool) -> Result<(), EngineError> {
        self.with_handle(id, |handle| handle.set_state(StableState::Stopped, force))
    }

    /// `container.destroy` — drives the engine to `offline`; the registry
    /// entry is removed once the engine actually settles there
    /// (self-eviction), not immediately. Until then `id` still appears in
    /// [`Registry::list`], per invariant 3.
    pub fn destroy(&self, id: &ContainerId) -> Result<(), EngineError> {
        self.with_handle(id, |handle| handle.set_state(StableState::Offline, false))
    }

    /// `container.query`.
    pub async fn query(&self, id: &ContainerId) -> Result<Snapshot, EngineError> {
        let handle = self.engines.lock().get(id).cloned().ok_or_else(|| EngineError::NotFound { id: id.clone() })?;
        handle.snapshot().await.ok_or_else(|| EngineError::NotFound { id: id.clone() })
    }

    /// `container.list`.
    pub fn list(&self) -> Vec<ContainerId> {
        self.engines.lock().keys().cloned().collect()
    }

    fn with_handle(&self, id: &ContainerId, f: impl FnOnce(&EngineHandle)) -> Result<(), EngineError> {
        let engines = self.engines.lock();
        let handle = engines.get(id).ok_or_else(|| EngineError::NotFound { id: id.clone() })?;
        f(handle);
        Ok(())
    }

    /// Drains one engine's event stream for its whole life: forwards every
    /// event onto the bus as a [`BroadcastEvent`], and evicts the registry
    /// entry on a terminal `offline` landing. One-way message passing only —
    /// the engine never calls back into the registry directly, per
    /// `spec.md` §9's cyclic-wiring design note.
    fn spawn_forwarder(&self, id: ContainerId, mut events: mpsc::UnboundedReceiver<EngineEvent>) {
        let bus = self.bus.clone();
        let engines = self.engines.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let Some(broadcast) = BroadcastEvent::from_engine_event(id.clone(), &event) {
                    bus.publish(broadcast);
                }
                if let EngineEvent::State { curr: State::Offline, prev } = event {
                    if prev != State::Offline {
                        engines.lock().remove(&id);
                        info!(id = %id, "container evicted at terminal offline");
                    }
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
