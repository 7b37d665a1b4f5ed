// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The container state vocabulary.
//!
//! A container is always in exactly one of seven states: three *stable*
//! states that the interior itself can report, and four *transient* states
//! that exist only inside the lifecycle engine while it drives a transition
//! between two stable states.

use serde::{Deserialize, Serialize};

/// A state the interior can authoritatively report.
///
/// The backend never reports anything outside this set — `interiorState`
/// (see the lifecycle engine) is always one of these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StableState {
    Offline,
    Stopped,
    Running,
}

crate::simple_display! {
    StableState {
        Offline => "offline",
        Stopped => "stopped",
        Running => "running",
    }
}

/// An engine-internal state bridging two stable states while a transition
/// is in flight. The interior never reports these directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransientState {
    Loading,
    Unloading,
    Starting,
    Stopping,
}

crate::simple_display! {
    TransientState {
        Loading => "loading",
        Unloading => "unloading",
        Starting => "starting",
        Stopping => "stopping",
    }
}

/// The full state of a container's lifecycle engine: one of the three
/// stable states, or one of the four transient states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Offline,
    Stopped,
    Running,
    Loading,
    Unloading,
    Starting,
    Stopping,
}

impl State {
    /// Whether this is one of the three interior-reportable states.
    pub fn is_stable(self) -> bool {
        self.as_stable().is_some()
    }

    /// Project onto a [`StableState`], or `None` while a transition is in flight.
    pub fn as_stable(self) -> Option<StableState> {
        match self {
            State::Offline => Some(StableState::Offline),
            State::Stopped => Some(StableState::Stopped),
            State::Running => Some(StableState::Running),
            State::Loading | State::Unloading | State::Starting | State::Stopping => None,
        }
    }
}

impl From<StableState> for State {
    fn from(s: StableState) -> Self {
        match s {
            StableState::Offline => State::Offline,
            StableState::Stopped => State::Stopped,
            StableState::Running => State::Running,
        }
    }
}

impl From<TransientState> for State {
    fn from(s: TransientState) -> Self {
        match s {
            TransientState::Loading => State::Loading,
            TransientState::Unloading => State::Unloading,
            TransientState::Starting => State::Starting,
            TransientState::Stopping => State::Stopping,
        }
    }
}

crate::simple_display! {
    State {
        Offline => "offline",
        Stopped => "stopped",
        Running => "running",
        Loading => "loading",
        Unloading => "unloading",
        Starting => "starting",
        Stopping => "stopping",
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
