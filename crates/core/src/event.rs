// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted by a lifecycle engine, and the broadcasts a registry
//! derives from them for the pub/sub bus.

use crate::error::EngineError;
use crate::id::ContainerId;
use crate::state::{StableState, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Something a single engine's event stream produces.
///
/// `state` events fire on every transition (stable or transient); `status`
/// on every interior status report; `error` on interior error or transition
/// failure; `ready` once when the engine settles at its expectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    State { curr: State, prev: State },
    Status { payload: Value },
    Error { error: EngineError },
    Ready { state: StableState },
}

/// What the registry forwards to the pub/sub bus after observing an
/// [`EngineEvent`]. One `EngineEvent` produces at most one `BroadcastEvent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum BroadcastEvent {
    #[serde(rename = "container.state")]
    ContainerState { id: ContainerId, state: State, last_state: State },
    #[serde(rename = "container.status")]
    ContainerStatus { id: ContainerId, status: Value },
    #[serde(rename = "container.error")]
    ContainerError {
        id: ContainerId,
        message: String,
        #[serde(flatten)]
        error: EngineError,
    },
}

impl BroadcastEvent {
    /// Derive the broadcast, if any, that an engine event produces for the
    /// given container id. `state` events need the previous value too,
    /// since `container.state` carries `lastState` rather than a delta.
    pub fn from_engine_event(id: ContainerId, event: &EngineEvent) -> Option<Self> {
        match event {
            EngineEvent::State { curr, prev } => {
                Some(BroadcastEvent::ContainerState { id, state: *curr, last_state: *prev })
            }
            EngineEvent::Status { payload } => {
                Some(BroadcastEvent::ContainerStatus { id, status: payload.clone() })
            }
            EngineEvent::Error { error } => {
                Some(BroadcastEvent::ContainerError { id, message: error.to_string(), error: error.clone() })
            }
            EngineEvent::Ready { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
