// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn container_create_serializes_with_a_type_tag() {
    let request = Request::ContainerCreate { id: "a".into(), conf: serde_json::json!({"kind": "fake"}) };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["type"], "ContainerCreate");
    assert_eq!(value["id"], "a");
}

#[test]
fn container_stop_force_defaults_to_false() {
    let value = serde_json::json!({"type": "ContainerStop", "id": "a"});
    let request: Request = serde_json::from_value(value).unwrap();
    assert_eq!(request, Request::ContainerStop { id: "a".into(), force: false });
}
