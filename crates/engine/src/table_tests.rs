// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corral_core::StableState::*;
use proptest::prelude::*;

#[test]
fn same_state_has_no_plan() {
    assert_eq!(path(Offline, Offline), None);
    assert_eq!(path(Stopped, Stopped), None);
    assert_eq!(path(Running, Running), None);
}

#[test]
fn offline_to_stopped_loads_with_auto_advance() {
    let plan = path(Offline, Stopped).unwrap();
    assert_eq!(plan.intermediate, TransientState::Loading);
    assert_eq!(plan.action, Action::Load);
    assert_eq!(plan.auto_advance, Some(Stopped));
    assert_eq!(plan.accepts, vec![Stopped]);
}

#[test]
fn offline_to_running_loads_first_then_accepts_running_as_final_waypoint() {
    let plan = path(Offline, Running).unwrap();
    assert_eq!(plan.intermediate, TransientState::Loading);
    assert_eq!(plan.action, Action::Load);
    assert_eq!(plan.auto_advance, Some(Stopped));
    assert_eq!(plan.accepts, vec![Stopped, Running]);
}

#[test]
fn stopped_to_offline_unloads_with_auto_advance() {
    let plan = path(Stopped, Offline).unwrap();
    assert_eq!(plan.intermediate, TransientState::Unloading);
    assert_eq!(plan.action, Action::Unload);
    assert_eq!(plan.auto_advance, Some(Offline));
    assert_eq!(plan.accepts, vec![Offline]);
}

#[test]
fn stopped_to_running_starts_with_no_fallback() {
    let plan = path(Stopped, Running).unwrap();
    assert_eq!(plan.intermediate, TransientState::Starting);
    assert_eq!(plan.action, Action::Start);
    assert_eq!(plan.auto_advance, None);
    assert_eq!(plan.accepts, vec![Running]);
}

#[test]
fn running_to_stopped_stops_with_no_fallback() {
    let plan = path(Running, Stopped).unwrap();
    assert_eq!(plan.intermediate, TransientState::Stopping);
    assert_eq!(plan.action, Action::Stop);
    assert_eq!(plan.auto_advance, None);
    assert_eq!(plan.accepts, vec![Stopped]);
}

#[test]
fn running_to_offline_stops_first_then_accepts_offline_as_final_waypoint() {
    let plan = path(Running, Offline).unwrap();
    assert_eq!(plan.intermediate, TransientState::Stopping);
    assert_eq!(plan.action, Action::Stop);
    assert_eq!(plan.auto_advance, None);
    assert_eq!(plan.accepts, vec![Stopped, Offline]);
}

fn any_stable() -> impl Strategy<Value = StableState> {
    prop_oneof![Just(Offline), Just(Stopped), Just(Running)]
}

proptest! {
    #[test]
    fn plan_accepts_always_ends_at_target(current in any_stable(), target in any_stable()) {
        if let Some(plan) = path(current, target) {
            prop_assert_eq!(*plan.accepts.last().unwrap(), target);
        }
    }

    #[test]
    fn plan_only_exists_when_current_differs_from_target(current in any_stable(), target in any_stable()) {
        prop_assert_eq!(path(current, target).is_some(), current != target);
    }
}
