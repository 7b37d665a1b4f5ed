// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker-CLI interior: shells out to `docker` for container lifecycle.
//!
//! Grounded on `crates/daemon/src/adapters/agent/docker/mod.rs`'s
//! `run_docker` helper and its create/run/readiness-poll shape. Unlike the
//! process interior, Docker distinguishes a created-but-not-running
//! container from a running one, so `load`/`unload` have real meaning here:
//! `docker create` / `docker rm`.

use async_trait::async_trait;
use corral_core::{ContainerId, StableState};
use corral_engine::interior::{ActionOpts, Interior, InteriorError, InteriorFactory, Monitor};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct DockerConfig {
    image: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    cmd: Vec<String>,
    #[serde(default = "default_poll_ms")]
    ready_poll_ms: u64,
    #[serde(default = "default_poll_attempts")]
    ready_attempts: usize,
}

fn default_poll_ms() -> u64 {
    200
}

fn default_poll_attempts() -> usize {
    75 // 75 * 200ms = 15s
}

/// An interior whose backend is a single named Docker container.
pub struct DockerInterior {
    container_name: String,
    config: DockerConfig,
    monitor: Monitor,
}

impl DockerInterior {
    fn new(id: &ContainerId, config: DockerConfig, monitor: Monitor) -> Self {
        Self { container_name: format!("corral-{id}"), config, monitor }
    }

    async fn run_docker(args: &[&str]) -> Result<String, String> {
        let output = Command::new("docker")
            .args(args)
            .output()
            .await
            .map_err(|e| format!("failed to exec docker: {e}"))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("docker {} failed: {}", args.first().unwrap_or(&""), stderr.trim()))
        }
    }

    async fn is_running(&self) -> bool {
        Self::run_docker(&["inspect", "-f", "{{.State.Running}}", &self.container_name])
            .await
            .map(|out| out == "true")
            .unwrap_or(false)
    }
}

#[async_trait]
impl Interior for DockerInterior {
    async fn load(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        let mut args: Vec<&str> = vec!["create", "--name", &self.container_name];
        args.extend(self.config.args.iter().map(String::as_str));
        args.push(&self.config.image);
        args.extend(self.config.cmd.iter().map(String::as_str));
        Self::run_docker(&args).await.map_err(InteriorError::Failed)?;
        self.monitor.state(StableState::Stopped);
        Ok(())
    }

    async fn unload(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        Self::run_docker(&["rm", "-f", &self.container_name]).await.map_err(InteriorError::Failed)?;
        self.monitor.state(StableState::Offline);
        Ok(())
    }

    async fn start(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        Self::run_docker(&["start", &self.container_name]).await.map_err(InteriorError::Failed)?;

        let monitor = self.monitor.clone();
        let container_name = self.container_name.clone();
        let poll_ms = self.config.ready_poll_ms;
        let max_attempts = self.config.ready_attempts;
        tokio::spawn(async move {
            for attempt in 0..max_attempts {
                if attempt > 0 {
                    tokio::time::sleep(Duration::from_millis(poll_ms)).await;
                }
                match Self::run_docker(&["inspect", "-f", "{{.State.Running}}", &container_name]).await {
                    Ok(out) if out == "true" => {
                        monitor.state(StableState::Running);
                        return;
                    }
                    _ => {}
                }
            }
            monitor.error(format!("{container_name} did not report running within the poll window"));
        });
        Ok(())
    }

    async fn stop(&self, opts: ActionOpts) -> Result<(), InteriorError> {
        let args: Vec<&str> = if opts.force {
            vec!["kill", &self.container_name]
        } else {
            vec!["stop", &self.container_name]
        };
        Self::run_docker(&args).await.map_err(InteriorError::Failed)?;
        self.monitor.state(StableState::Stopped);
        Ok(())
    }

    async fn status(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        let running = self.is_running().await;
        self.monitor.status(serde_json::json!({"container": self.container_name, "running": running}));
        Ok(())
    }
}

/// Builds [`DockerInterior`]s from `{"image": "...", "args": [...], "cmd": [...]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerFactory;

impl InteriorFactory for DockerFactory {
    fn kind(&self) -> &'static str {
        "docker"
    }

    fn create(&self, id: &ContainerId, config: &Value, monitor: Monitor) -> Result<Arc<dyn Interior>, String> {
        let config: DockerConfig =
            serde_json::from_value(config.clone()).map_err(|e| format!("invalid docker config: {e}"))?;
        Ok(Arc::new(DockerInterior::new(id, config, monitor)))
    }
}

#[cfg(test)]
#[path = "docker_tests.rs"]
mod tests;
