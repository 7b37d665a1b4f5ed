// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lifecycle engine: one task per container, owning all mutable state
//! and serializing every interior interaction through its own mailbox.

use crate::interior::{ActionOpts, Interior, InteriorError, InteriorEvent};
use crate::table::{path, Action};
use corral_core::{ContainerId, EngineError, EngineEvent, StableState, State, TransientState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// An atomic read of a container's lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: ContainerId,
    pub state: State,
    pub interior_state: StableState,
    pub status: Option<Value>,
}

enum Command {
    SetState { target: StableState, force: bool },
    Status,
    Snapshot(oneshot::Sender<Snapshot>),
    ActionUnsupported { auto_advance: Option<StableState>, force: bool },
    InteriorFailed(String),
}

/// A cheap, cloneable handle to a running engine's mailbox.
#[derive(Clone)]
pub struct EngineHandle {
    id: ContainerId,
    tx: mpsc::UnboundedSender<Command>,
}

impl EngineHandle {
    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    /// Record a new target state. Returns immediately — per `spec.md` §5,
    /// the engine never blocks; the transition plays out asynchronously and
    /// is observed through the event stream passed to [`spawn`].
    pub fn set_state(&self, target: StableState, force: bool) {
        let _ = self.tx.send(Command::SetState { target, force });
    }

    /// Ask the interior for a fresh status report. Idempotent — results
    /// flow back asynchronously via the engine's event stream.
    pub fn request_status(&self) {
        let _ = self.tx.send(Command::Status);
    }

    /// `{id, state, interiorState, status}` as an atomic read.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(Command::Snapshot(reply_tx)).ok()?;
        reply_rx.await.ok()
    }
}

/// Start a new lifecycle engine for `id`, owning `interior` for its whole
/// life. `monitor_rx` is the receiving end of the [`Monitor`] handed to
/// `interior` at construction time; `events` receives every `state`/
/// `status`/`error`/`ready` event the engine emits.
pub fn spawn(
    id: ContainerId,
    interior: Arc<dyn Interior>,
    monitor_rx: mpsc::UnboundedReceiver<InteriorEvent>,
    events: mpsc::UnboundedSender<EngineEvent>,
) -> EngineHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = Task {
        id: id.clone(),
        state: State::Offline,
        expectation: None,
        interior_state: StableState::Offline,
        status: None,
        active_action: None,
        active_intermediate: None,
        active_accepts: Vec::new(),
        interior,
    };
    tokio::spawn(task.run(rx, monitor_rx, events, tx.clone()));
    EngineHandle { id, tx }
}

struct Task {
    id: ContainerId,
    state: State,
    /// The last-requested target plus the `force` it was scheduled with —
    /// kept together so a stop that gets replanned at a later settle point
    /// (see `handle_state_report`) can recover `force` instead of losing it.
    expectation: Option<(StableState, bool)>,
    interior_state: StableState,
    status: Option<Value>,
    active_action: Option<Action>,
    /// The transient state entered for the plan currently driving
    /// `expectation`, kept only to render the full waypoint list (transient
    /// + stable) in a `TransitionFailed`'s `accepts` field.
    active_intermediate: Option<TransientState>,
    /// The stable waypoints accepted for the plan currently driving
    /// `expectation`. See `crates/engine/src/table.rs` for why this is
    /// enough to validate every subsequent interior report without the
    /// transition table needing transient-keyed entries of its own.
    active_accepts: Vec<StableState>,
    interior: Arc<dyn Interior>,
}

impl Task {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut monitor: mpsc::UnboundedReceiver<InteriorEvent>,
        events: mpsc::UnboundedSender<EngineEvent>,
        self_tx: mpsc::UnboundedSender<Command>,
    ) {
        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd, &events, &self_tx),
                        None => break,
                    }
                }
                event = monitor.recv() => {
                    match event {
                        Some(event) => self.handle_interior_event(event, &events, &self_tx),
                        None => break,
                    }
                }
            }
        }
        debug!(id = %self.id, "lifecycle engine task exiting");
    }

    fn handle_command(
        &mut self,
        cmd: Command,
        events: &mpsc::UnboundedSender<EngineEvent>,
        self_tx: &mpsc::UnboundedSender<Command>,
    ) {
        match cmd {
            Command::SetState { target, force } => self.set_state(target, force, events, self_tx),
            Command::Status => self.dispatch_status(self_tx),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::ActionUnsupported { auto_advance, force } => match auto_advance {
                Some(s) => self.handle_state_report(s, events, self_tx),
                None => {
                    let _ = force;
                    debug!(id = %self.id, state = %self.state, "action unsupported with no fallback; waiting");
                }
            },
            Command::InteriorFailed(message) => {
                warn!(id = %self.id, %message, "interior error");
                let _ = events.send(EngineEvent::Error { error: EngineError::InteriorError { message } });
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            id: self.id.clone(),
            state: self.state,
            interior_state: self.interior_state,
            status: self.status.clone(),
        }
    }

    /// `setState(target)` — see `spec.md` §4.2's public contract.
    fn set_state(
        &mut self,
        target: StableState,
        force: bool,
        events: &mpsc::UnboundedSender<EngineEvent>,
        self_tx: &mpsc::UnboundedSender<Command>,
    ) {
        self.expectation = Some((target, force));

        // force is only meaningful against an in-flight stop; nudge it
        // again rather than waiting for the next settle point, since the
        // in-flight call can't be cancelled and reissued.
        if force && self.active_action == Some(Action::Stop) {
            self.redispatch_stop(force, self_tx);
            return;
        }

        if let Some(current) = self.state.as_stable() {
            self.begin_transition(current, target, force, events, self_tx);
        }
        // Else: the engine is mid-transition. The expectation is stored and
        // evaluated at the next settle point (`handle_state_report`).
    }

    fn begin_transition(
        &mut self,
        current: StableState,
        target: StableState,
        force: bool,
        events: &mpsc::UnboundedSender<EngineEvent>,
        self_tx: &mpsc::UnboundedSender<Command>,
    ) {
        let Some(plan) = path(current, target) else {
            // Already there — setState is a no-op at the expectation level.
            return;
        };

        let prev = self.state;
        self.state = plan.intermediate.into();
        self.active_action = Some(plan.action);
        self.active_intermediate = Some(plan.intermediate);
        self.active_accepts = plan.accepts.clone();
        info!(id = %self.id, %prev, curr = %self.state, "state transition");
        let _ = events.send(EngineEvent::State { curr: self.state, prev });

        let opts = ActionOpts { force: force && plan.action == Action::Stop };
        self.dispatch_action(plan.action, plan.auto_advance, opts, self_tx);
    }

    fn dispatch_action(
        &self,
        action: Action,
        auto_advance: Option<StableState>,
        opts: ActionOpts,
        self_tx: &mpsc::UnboundedSender<Command>,
    ) {
        let interior = self.interior.clone();
        let self_tx = self_tx.clone();
        let force = opts.force;
        tokio::spawn(async move {
            let result = match action {
                Action::Load => interior.load(opts).await,
                Action::Unload => interior.unload(opts).await,
                Action::Start => interior.start(opts).await,
                Action::Stop => interior.stop(opts).await,
            };
            match result {
                Ok(()) => {}
                Err(InteriorError::Unsupported(_)) => {
                    let _ = self_tx.send(Command::ActionUnsupported { auto_advance, force });
                }
                Err(InteriorError::Failed(message)) => {
                    let _ = self_tx.send(Command::InteriorFailed(message));
                }
            }
        });
    }

    fn redispatch_stop(&self, force: bool, self_tx: &mpsc::UnboundedSender<Command>) {
        self.dispatch_action(Action::Stop, None, ActionOpts { force }, self_tx);
    }

    fn dispatch_status(&self, self_tx: &mpsc::UnboundedSender<Command>) {
        let interior = self.interior.clone();
        let self_tx = self_tx.clone();
        tokio::spawn(async move {
            if let Err(InteriorError::Failed(message)) = interior.status(ActionOpts::default()).await {
                let _ = self_tx.send(Command::InteriorFailed(message));
            }
        });
    }

    fn handle_interior_event(
        &mut self,
        event: InteriorEvent,
        events: &mpsc::UnboundedSender<EngineEvent>,
        self_tx: &mpsc::UnboundedSender<Command>,
    ) {
        match event {
            InteriorEvent::Status(payload) => {
                self.status = Some(payload.clone());
                let _ = events.send(EngineEvent::Status { payload });
            }
            InteriorEvent::Error(message) => {
                warn!(id = %self.id, %message, "interior error");
                let _ = events.send(EngineEvent::Error { error: EngineError::InteriorError { message } });
            }
            InteriorEvent::State(s) => self.handle_state_report(s, events, self_tx),
        }
    }

    /// Step 4 of `spec.md` §4.2.2's transition execution algorithm.
    fn handle_state_report(
        &mut self,
        s: StableState,
        events: &mpsc::UnboundedSender<EngineEvent>,
        self_tx: &mpsc::UnboundedSender<Command>,
    ) {
        let Some((target, force)) = self.expectation else {
            // Unsolicited report with no active plan — still authoritative;
            // adopt it so interiorState never lags the backend's truth.
            self.land(s, events);
            return;
        };

        if !self.active_accepts.contains(&s) {
            let mut accepts: Vec<State> = Vec::new();
            if let Some(intermediate) = self.active_intermediate {
                accepts.push(intermediate.into());
            }
            accepts.extend(self.active_accepts.iter().map(|s| State::from(*s)));
            self.land(s, events);
            self.active_action = None;
            self.active_intermediate = None;
            self.expectation = None;
            warn!(id = %self.id, expectation = %target, actual = %s, "transition failed");
            let _ = events.send(EngineEvent::Error {
                error: EngineError::TransitionFailed { expectation: target, actual: s, accepts },
            });
            return;
        }

        self.land(s, events);
        self.active_action = None;
        self.active_intermediate = None;

        if s == target {
            self.expectation = None;
            info!(id = %self.id, state = %s, "settled");
            let _ = events.send(EngineEvent::Ready { state: target });
        } else {
            self.begin_transition(s, target, force, events, self_tx);
        }
    }

    /// Adopt `s` as the new interior-reported and engine state, emitting
    /// `state` only if it actually changed.
    fn land(&mut self, s: StableState, events: &mpsc::UnboundedSender<EngineEvent>) {
        self.interior_state = s;
        let prev = self.state;
        self.state = s.into();
        if prev != self.state {
            let _ = events.send(EngineEvent::State { curr: self.state, prev });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
