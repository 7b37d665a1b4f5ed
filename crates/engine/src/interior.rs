// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Interior` contract: the opaque backend a lifecycle engine drives.
//!
//! Mirrors the teacher's `AgentAdapter` trait shape — a factory constructs
//! one interior per container, action methods are non-blocking and
//! fire-and-forget, and results arrive later through a monitor channel
//! rather than as the return value of the call that triggered them.

use async_trait::async_trait;
use corral_core::{ContainerId, StableState};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Backend-originated error, passed through to the engine verbatim.
#[derive(Debug, Clone, Error)]
pub enum InteriorError {
    /// The invoked method has no implementation on this backend. The engine
    /// reacts to this by consulting the transition table's `auto_advance`.
    #[error("{0} is not supported by this interior")]
    Unsupported(&'static str),
    /// The backend failed to even dispatch the action (e.g. spawn failed).
    /// Distinct from `Unsupported`: this is a real failure, not an absent
    /// capability, and is surfaced to the engine as `EngineError::InteriorError`.
    #[error("{0}")]
    Failed(String),
}

/// Options accompanying an action invocation. `force` only has meaning for
/// `stop`; the transition table has no notion of it — see `DESIGN.md`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionOpts {
    pub force: bool,
}

/// One report from the backend, delivered out-of-band from whatever action
/// call triggered it.
#[derive(Debug, Clone)]
pub enum InteriorEvent {
    /// Authoritative — always one of the three stable states.
    State(StableState),
    /// Backend-specific payload, opaque to the engine.
    Status(Value),
    /// Backend-originated error. Does not change engine state.
    Error(String),
}

/// Handle an interior uses to report back to its engine. Cloneable and
/// cheap to hold past the lifetime of any single action call.
#[derive(Clone)]
pub struct Monitor {
    tx: mpsc::UnboundedSender<InteriorEvent>,
}

impl Monitor {
    pub fn new(tx: mpsc::UnboundedSender<InteriorEvent>) -> Self {
        Self { tx }
    }

    /// Report a new authoritative stable state. Best-effort: if the engine
    /// has already shut down, the report is silently dropped.
    pub fn state(&self, state: StableState) {
        let _ = self.tx.send(InteriorEvent::State(state));
    }

    pub fn status(&self, payload: Value) {
        let _ = self.tx.send(InteriorEvent::Status(payload));
    }

    pub fn error(&self, message: impl Into<String>) {
        let _ = self.tx.send(InteriorEvent::Error(message.into()));
    }
}

/// The backend a lifecycle engine drives. One instance per container, owned
/// for the life of its engine.
///
/// Every method is optional except `stop` — a backend that can be loaded
/// but never explicitly stopped (e.g. it only ever exits on its own) still
/// must implement `stop`, even if that's just reporting `stopped` or
/// `offline` once whatever signal it sends has been observed.
#[async_trait]
pub trait Interior: Send + Sync + 'static {
    async fn load(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        Err(InteriorError::Unsupported("load"))
    }

    async fn unload(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        Err(InteriorError::Unsupported("unload"))
    }

    async fn start(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        Err(InteriorError::Unsupported("start"))
    }

    /// Mandatory: every interior must be stoppable.
    async fn stop(&self, opts: ActionOpts) -> Result<(), InteriorError>;

    async fn status(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        Err(InteriorError::Unsupported("status"))
    }
}

/// Constructs an `Interior` for a container given its id and a JSON config
/// document (the `conf` field of `container.create`). Factories are looked
/// up by the config's `kind` field.
pub trait InteriorFactory: Send + Sync + 'static {
    /// Name used in config's `{"kind": "..."}` discriminator.
    fn kind(&self) -> &'static str;

    fn create(&self, id: &ContainerId, config: &Value, monitor: Monitor) -> Result<Arc<dyn Interior>, String>;
}

#[cfg(test)]
#[path = "interior_tests.rs"]
mod tests;
