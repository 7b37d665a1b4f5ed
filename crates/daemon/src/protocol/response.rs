// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use corral_core::{BroadcastEvent, ContainerId, EngineError, State, StableState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response from the daemon to a client. Request-style errors (`InvalidConfig`,
/// `Conflict`, `NotFound`, `InvalidArgument`) are carried as `Error`; the
/// asynchronous ones (`TransitionFailed`, `InteriorError`) never appear here —
/// they ride the engine's event stream and are forwarded as `Broadcast` frames
/// to `monitor` subscribers instead, per `spec.md` §7's propagation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Ok,
    Pong,
    Hello { version: String },
    ShuttingDown,

    /// A container snapshot, for `container.query`.
    ContainerSnapshot {
        id: ContainerId,
        state: State,
        interior_state: StableState,
        status: Option<Value>,
    },

    /// Ids currently registered, for `container.list`.
    ContainerIds { ids: Vec<ContainerId> },

    /// One frame pushed to a `Monitor` subscriber. Never sent in reply to a
    /// request that expects a single response.
    Broadcast { event: BroadcastEvent },

    Error { error: EngineError },
}

impl Response {
    pub fn error(error: EngineError) -> Self {
        Response::Error { error }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
