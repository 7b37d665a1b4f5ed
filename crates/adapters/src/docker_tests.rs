// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn factory_rejects_missing_image() {
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let monitor = Monitor::new(tx);
    let result = DockerFactory.create(&ContainerId::from("dk-1"), &serde_json::json!({}), monitor);
    assert!(result.is_err());
}

#[test]
fn factory_accepts_minimal_image_only_config() {
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let monitor = Monitor::new(tx);
    let config = serde_json::json!({"image": "alpine:latest"});
    let result = DockerFactory.create(&ContainerId::from("dk-1"), &config, monitor);
    assert!(result.is_ok());
}

#[test]
fn container_name_is_namespaced_by_id() {
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let monitor = Monitor::new(tx);
    let config = DockerConfig {
        image: "alpine:latest".into(),
        args: Vec::new(),
        cmd: Vec::new(),
        ready_poll_ms: default_poll_ms(),
        ready_attempts: default_poll_attempts(),
    };
    let interior = DockerInterior::new(&ContainerId::from("web-1"), config, monitor);
    assert_eq!(interior.container_name, "corral-web-1");
}
