// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The transition table: pure data mapping every `(current, target)` stable
//! pair to the plan the lifecycle engine executes to get there.
//!
//! `path` is only ever called with a stable `current` — see `DESIGN.md` for
//! why the six "retarget mid-flight" rows in the spec's table don't need
//! their own entries here: they fall out of recursing through the six rows
//! below, one settle point at a time.

use corral_core::{StableState, TransientState};
use serde::{Deserialize, Serialize};

/// The interior method a plan's intermediate state dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Load,
    Unload,
    Start,
    Stop,
}

corral_core::simple_display! {
    Action {
        Load => "load",
        Unload => "unload",
        Start => "start",
        Stop => "stop",
    }
}

/// The plan for driving the engine from `current` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// The transient state to enter immediately.
    pub intermediate: TransientState,
    /// The interior method to invoke after entering `intermediate`.
    pub action: Action,
    /// If `action` isn't implemented on the interior, jump straight here
    /// instead of waiting for a monitor report.
    pub auto_advance: Option<StableState>,
    /// The ordered stable waypoints the engine may see reported by the
    /// interior on its way to `target`; the last entry is always `target`.
    /// Does not include `intermediate` itself — that's validated separately,
    /// by invariant 1(a), against whatever plan is active when it's entered.
    pub accepts: Vec<StableState>,
}

/// Look up the plan for `current -> target`. Returns `None` when the pair is
/// equal (no transition needed — the caller should settle immediately).
pub fn path(current: StableState, target: StableState) -> Option<Plan> {
    use StableState::*;

    if current == target {
        return None;
    }

    Some(match (current, target) {
        (Offline, Stopped) => {
            Plan { intermediate: TransientState::Loading, action: Action::Load, auto_advance: Some(Stopped), accepts: vec![Stopped] }
        }
        (Offline, Running) => Plan {
            intermediate: TransientState::Loading,
            action: Action::Load,
            auto_advance: Some(Stopped),
            accepts: vec![Stopped, Running],
        },
        (Stopped, Offline) => Plan {
            intermediate: TransientState::Unloading,
            action: Action::Unload,
            auto_advance: Some(Offline),
            accepts: vec![Offline],
        },
        (Stopped, Running) => {
            Plan { intermediate: TransientState::Starting, action: Action::Start, auto_advance: None, accepts: vec![Running] }
        }
        (Running, Stopped) => {
            Plan { intermediate: TransientState::Stopping, action: Action::Stop, auto_advance: None, accepts: vec![Stopped] }
        }
        (Running, Offline) => Plan {
            intermediate: TransientState::Stopping,
            action: Action::Stop,
            auto_advance: None,
            accepts: vec![Stopped, Offline],
        },
    })
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
