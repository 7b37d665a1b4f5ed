// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corral_core::EngineError;

#[test]
fn error_response_carries_the_engine_error_kind_tag() {
    let response = Response::error(EngineError::NotFound { id: "a".into() });
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["type"], "Error");
    assert_eq!(value["error"]["kind"], "not_found");
}

#[test]
fn container_ids_round_trips() {
    let response = Response::ContainerIds { ids: vec!["a".into(), "b".into()] };
    let value = serde_json::to_value(&response).unwrap();
    let decoded: Response = serde_json::from_value(value).unwrap();
    match decoded {
        Response::ContainerIds { ids } => assert_eq!(ids, vec!["a".into(), "b".into()]),
        other => panic!("unexpected response: {other:?}"),
    }
}
