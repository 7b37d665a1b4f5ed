// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corral_adapters::FakeFactory;
use corral_core::StableState;
use std::time::Duration;

fn registry() -> Registry {
    RegistryBuilder::new().with_factory(Arc::new(FakeFactory)).build(EventBus::new())
}

#[tokio::test]
async fn create_drives_the_fresh_engine_to_stopped() {
    let registry = registry();
    registry.create("a".into(), serde_json::json!({"kind": "fake"})).unwrap();

    // `fake`'s load is unsupported by default, so the engine auto-advances
    // straight to `stopped` without needing a scripted monitor report.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let snapshot = registry.query(&"a".into()).await.unwrap();
    assert_eq!(snapshot.interior_state, StableState::Stopped);
}

#[tokio::test]
async fn create_twice_is_a_conflict() {
    let registry = registry();
    registry.create("a".into(), serde_json::json!({"kind": "fake"})).unwrap();
    let err = registry.create("a".into(), serde_json::json!({"kind": "fake"})).unwrap_err();
    assert!(matches!(err, EngineError::Conflict { .. }));
}

#[tokio::test]
async fn create_with_unknown_kind_is_invalid_config() {
    let registry = registry();
    let err = registry.create("a".into(), serde_json::json!({"kind": "nonexistent"})).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig { .. }));
}

#[tokio::test]
async fn operations_against_an_unknown_id_are_not_found() {
    let registry = registry();
    assert!(matches!(registry.start(&"ghost".into()), Err(EngineError::NotFound { .. })));
    assert!(matches!(registry.stop(&"ghost".into(), false), Err(EngineError::NotFound { .. })));
    assert!(matches!(registry.destroy(&"ghost".into()), Err(EngineError::NotFound { .. })));
    assert!(matches!(registry.query(&"ghost".into()).await, Err(EngineError::NotFound { .. })));
}

#[tokio::test]
async fn list_reflects_registered_ids() {
    let registry = registry();
    registry.create("a".into(), serde_json::json!({"kind": "fake"})).unwrap();
    registry.create("b".into(), serde_json::json!({"kind": "fake"})).unwrap();
    let mut ids: Vec<String> = registry.list().into_iter().map(|id| id.to_string()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn destroy_evicts_once_the_engine_lands_at_offline() {
    let registry = registry();
    registry.create("a".into(), serde_json::json!({"kind": "fake"})).unwrap();

    // let create's own stopped expectation settle first, then destroy from
    // there. `fake`'s unload is unsupported by default, so the unload hop
    // auto-advances without any scripted monitor report.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(registry.query(&"a".into()).await.unwrap().interior_state, StableState::Stopped);

    registry.destroy(&"a".into()).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(registry.list().len(), 0);
}

#[tokio::test]
async fn destroy_before_create_settles_is_still_evicted() {
    let registry = registry();
    registry.create("a".into(), serde_json::json!({"kind": "fake"})).unwrap();
    // retarget to offline immediately, before create's own stopped
    // expectation has had a chance to settle.
    registry.destroy(&"a".into()).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(registry.list().len(), 0);
}
