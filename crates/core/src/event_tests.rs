// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::state::State;
use serde_json::json;

#[test]
fn state_event_forwards_as_container_state_with_last_state() {
    let event = EngineEvent::State { curr: State::Loading, prev: State::Offline };
    let broadcast = BroadcastEvent::from_engine_event(ContainerId::from("web-1"), &event).unwrap();
    match broadcast {
        BroadcastEvent::ContainerState { id, state, last_state } => {
            assert_eq!(id, *"web-1");
            assert_eq!(state, State::Loading);
            assert_eq!(last_state, State::Offline);
        }
        other => panic!("unexpected broadcast: {other:?}"),
    }
}

#[test]
fn status_event_forwards_payload_verbatim() {
    let event = EngineEvent::Status { payload: json!({"cpu": 12}) };
    let broadcast = BroadcastEvent::from_engine_event(ContainerId::from("web-1"), &event).unwrap();
    match broadcast {
        BroadcastEvent::ContainerStatus { status, .. } => assert_eq!(status, json!({"cpu": 12})),
        other => panic!("unexpected broadcast: {other:?}"),
    }
}

#[test]
fn error_event_forwards_with_rendered_message() {
    let error = EngineError::NotFound { id: ContainerId::from("web-1") };
    let event = EngineEvent::Error { error: error.clone() };
    let broadcast = BroadcastEvent::from_engine_event(ContainerId::from("web-1"), &event).unwrap();
    match broadcast {
        BroadcastEvent::ContainerError { message, .. } => assert_eq!(message, error.to_string()),
        other => panic!("unexpected broadcast: {other:?}"),
    }
}

#[test]
fn ready_event_produces_no_broadcast() {
    let event = EngineEvent::Ready { state: StableState::Running };
    assert!(BroadcastEvent::from_engine_event(ContainerId::from("web-1"), &event).is_none());
}

#[test]
fn container_error_broadcast_serializes_flattened_error_fields() {
    let event = EngineEvent::Error { error: EngineError::NotFound { id: ContainerId::from("web-1") } };
    let broadcast = BroadcastEvent::from_engine_event(ContainerId::from("web-1"), &event).unwrap();
    let json = serde_json::to_value(&broadcast).unwrap();
    assert_eq!(json["topic"], "container.error");
    assert_eq!(json["kind"], "not_found");
    assert_eq!(json["message"], "container web-1 not found");
}
