// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's error taxonomy.
//!
//! The first four variants are request-style errors, surfaced synchronously
//! in a response envelope by whatever dispatches against the registry. The
//! last two are asynchronous: they ride the engine's own event stream and
//! are broadcast over `container.error`, never returned from a call.

use crate::id::ContainerId;
use crate::state::{StableState, State};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the lifecycle engine and the registry that owns it.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineError {
    /// Configuration is missing, malformed, or names an unknown interior.
    /// Surfaced at `create`; the engine is never instantiated.
    #[error("invalid config for {id}: {reason}")]
    InvalidConfig { id: ContainerId, reason: String },

    /// `create` was called for an id already registered.
    #[error("container {id} already exists")]
    Conflict { id: ContainerId },

    /// An operation targeted an id the registry doesn't know about.
    #[error("container {id} not found")]
    NotFound { id: ContainerId },

    /// `setState` was called with a target that isn't a stable state.
    #[error("{target} is not a stable state")]
    InvalidArgument { target: String },

    /// A TCP connection failed the wire protocol's auth gate: either it sent
    /// something other than `Hello` as its first request, or its `Hello`
    /// carried a missing or mismatched bearer token.
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// The interior reported a state outside the accepted path for the
    /// active plan. The expectation is cleared; the engine settles at
    /// `actual` and waits for a fresh `setState`. `accepts` is the full
    /// waypoint sequence of the active plan — transient and stable alike,
    /// in the order the transition table lists them.
    #[error("transition to {expectation} failed: interior reported {actual}, expected one of {accepts:?}")]
    TransitionFailed { expectation: StableState, actual: StableState, accepts: Vec<State> },

    /// Backend-originated error, passed through verbatim. Engine state is
    /// unchanged.
    #[error("interior error: {message}")]
    InteriorError { message: String },
}

impl EngineError {
    /// The id this error concerns, when the variant carries one.
    pub fn container_id(&self) -> Option<&ContainerId> {
        match self {
            EngineError::InvalidConfig { id, .. }
            | EngineError::Conflict { id }
            | EngineError::NotFound { id } => Some(id),
            EngineError::InvalidArgument { .. }
            | EngineError::Unauthorized { .. }
            | EngineError::TransitionFailed { .. }
            | EngineError::InteriorError { .. } => None,
        }
    }

    /// Whether this error rides the engine's event stream (async) rather
    /// than being returned synchronously from a dispatch call.
    pub fn is_async(&self) -> bool {
        matches!(self, EngineError::TransitionFailed { .. } | EngineError::InteriorError { .. })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
