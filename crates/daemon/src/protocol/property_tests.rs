// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Every `Request`/`Response` variant round-trips through the wire codec.
//!
//! Grounded on the teacher's `protocol/property_tests.rs`: enumerate every
//! variant with minimal fixed field values, then assert `decode(encode(v))
//! == v` (or, for `Response`, which carries non-`PartialEq` error payloads,
//! that it decodes into the same variant shape).

use super::wire::{decode, encode};
use super::*;
use corral_core::EngineError;

fn s() -> String {
    String::new()
}

fn all_requests() -> Vec<Request> {
    vec![
        Request::Ping,
        Request::Hello { version: s(), token: None },
        Request::Shutdown { kill: false },
        Request::ContainerCreate { id: "a".into(), conf: serde_json::json!({}) },
        Request::ContainerStart { id: "a".into() },
        Request::ContainerStop { id: "a".into(), force: false },
        Request::ContainerDestroy { id: "a".into() },
        Request::ContainerQuery { id: "a".into() },
        Request::ContainerList,
        Request::Monitor,
    ]
}

#[test]
fn every_request_variant_round_trips() {
    for request in all_requests() {
        let framed = encode(&request).unwrap();
        let decoded: Request = decode(&framed[4..]).unwrap();
        assert_eq!(decoded, request, "round-trip mismatch for {request:?}");
    }
}

#[test]
fn every_response_variant_round_trips_to_the_same_tag() {
    let responses = vec![
        Response::Ok,
        Response::Pong,
        Response::Hello { version: s() },
        Response::ShuttingDown,
        Response::ContainerIds { ids: vec![] },
        Response::error(EngineError::NotFound { id: "a".into() }),
    ];
    for response in responses {
        let before = serde_json::to_value(&response).unwrap()["type"].clone();
        let framed = encode(&response).unwrap();
        let decoded: Response = decode(&framed[4..]).unwrap();
        let after = serde_json::to_value(&decoded).unwrap()["type"].clone();
        assert_eq!(before, after);
    }
}
