// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory, scriptable [`Interior`] for exercising the engine and
//! higher layers without a real backend.
//!
//! Grounded on the teacher's `FakeAgentAdapter`/`AgentCall` pair (referenced
//! from `adapters/agent/mod.rs`'s `pub use fake::{AgentCall, FakeAgentAdapter};`):
//! a call log callers can assert against, plus a scripted outcome per method
//! that defaults to success.

use async_trait::async_trait;
use corral_core::{ContainerId, StableState};
use corral_engine::interior::{ActionOpts, Interior, InteriorError, InteriorFactory, Monitor};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// One recorded invocation against a [`FakeInterior`].
#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    Load(ActionOpts),
    Unload(ActionOpts),
    Start(ActionOpts),
    Stop(ActionOpts),
    Status(ActionOpts),
}

#[derive(Default)]
struct Script {
    load: Option<Result<(), InteriorError>>,
    unload: Option<Result<(), InteriorError>>,
    start: Option<Result<(), InteriorError>>,
    stop: Result<(), InteriorError>,
    status: Option<Result<(), InteriorError>>,
}

/// A fake interior whose per-method outcomes are scripted ahead of time and
/// whose invocations are logged for later assertions.
///
/// Unlike [`ProcessInterior`](crate::process::ProcessInterior), none of the
/// scripted actions report a state back through `monitor` on their own —
/// call [`FakeInterior::report`] explicitly, mirroring how a real backend's
/// settlement arrives asynchronously and independently of the call that
/// dispatched the action.
pub struct FakeInterior {
    calls: Mutex<Vec<FakeCall>>,
    script: Mutex<Script>,
    monitor: Monitor,
}

impl FakeInterior {
    pub fn new(monitor: Monitor) -> Self {
        Self { calls: Mutex::new(Vec::new()), script: Mutex::new(Script::default()), monitor }
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().clone()
    }

    pub fn set_load(&self, result: Result<(), InteriorError>) {
        self.script.lock().load = Some(result);
    }

    pub fn set_unload(&self, result: Result<(), InteriorError>) {
        self.script.lock().unload = Some(result);
    }

    pub fn set_start(&self, result: Result<(), InteriorError>) {
        self.script.lock().start = Some(result);
    }

    pub fn set_stop(&self, result: Result<(), InteriorError>) {
        self.script.lock().stop = result;
    }

    pub fn set_status(&self, result: Result<(), InteriorError>) {
        self.script.lock().status = Some(result);
    }

    /// Reports a state transition through this interior's monitor, as if a
    /// real backend had just settled.
    pub fn report(&self, state: StableState) {
        self.monitor.state(state);
    }
}

#[async_trait]
impl Interior for FakeInterior {
    async fn load(&self, opts: ActionOpts) -> Result<(), InteriorError> {
        self.calls.lock().push(FakeCall::Load(opts.clone()));
        self.script.lock().load.clone().unwrap_or(Err(InteriorError::Unsupported("load")))
    }

    async fn unload(&self, opts: ActionOpts) -> Result<(), InteriorError> {
        self.calls.lock().push(FakeCall::Unload(opts.clone()));
        self.script.lock().unload.clone().unwrap_or(Err(InteriorError::Unsupported("unload")))
    }

    async fn start(&self, opts: ActionOpts) -> Result<(), InteriorError> {
        self.calls.lock().push(FakeCall::Start(opts.clone()));
        self.script.lock().start.clone().unwrap_or(Err(InteriorError::Unsupported("start")))
    }

    async fn stop(&self, opts: ActionOpts) -> Result<(), InteriorError> {
        self.calls.lock().push(FakeCall::Stop(opts.clone()));
        self.script.lock().stop.clone()
    }

    async fn status(&self, opts: ActionOpts) -> Result<(), InteriorError> {
        self.calls.lock().push(FakeCall::Status(opts.clone()));
        self.script.lock().status.clone().unwrap_or(Err(InteriorError::Unsupported("status")))
    }
}

/// Builds [`FakeInterior`]s, ignoring whatever config it's handed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeFactory;

impl InteriorFactory for FakeFactory {
    fn kind(&self) -> &'static str {
        "fake"
    }

    fn create(&self, _id: &ContainerId, _config: &Value, monitor: Monitor) -> Result<Arc<dyn Interior>, String> {
        Ok(Arc::new(FakeInterior::new(monitor)))
    }
}
