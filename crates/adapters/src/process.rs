// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess-supervisor interior: wraps a single long-running child process.
//!
//! Grounded on `crates/daemon/src/adapters/agent/coop/spawn.rs`'s spawn +
//! reaper pattern. A bare process has no distinct "loaded but not running"
//! state, so `load`/`unload` are left at their `Unsupported` default — the
//! transition table's `auto_advance` carries the engine through `stopped`/
//! `offline` on its behalf. Only `start`/`stop`/`status` are implemented.

use async_trait::async_trait;
use corral_core::{ContainerId, StableState};
use corral_engine::interior::{ActionOpts, Interior, InteriorError, InteriorFactory, Monitor};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct ProcessConfig {
    command: String,
    #[serde(default)]
    cwd: Option<PathBuf>,
    #[serde(default)]
    env: Vec<(String, String)>,
}

struct Inner {
    pid: Mutex<Option<u32>>,
    stopping: AtomicBool,
}

/// An interior whose backend is one supervised child process.
pub struct ProcessInterior {
    config: ProcessConfig,
    monitor: Monitor,
    inner: Arc<Inner>,
}

impl ProcessInterior {
    fn new(config: ProcessConfig, monitor: Monitor) -> Self {
        Self { config, monitor, inner: Arc::new(Inner { pid: Mutex::new(None), stopping: AtomicBool::new(false) }) }
    }
}

#[async_trait]
impl Interior for ProcessInterior {
    async fn start(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.config.command);
        if let Some(cwd) = &self.config.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &self.config.env {
            cmd.env(key, value);
        }
        cmd.stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        let child = cmd.spawn().map_err(|e| InteriorError::Failed(format!("spawn failed: {e}")))?;
        let pid = child.id();
        *self.inner.pid.lock() = pid;
        self.inner.stopping.store(false, Ordering::SeqCst);

        let inner = self.inner.clone();
        let monitor = self.monitor.clone();
        tokio::spawn(async move {
            match child.wait_with_output().await {
                Ok(output) => {
                    *inner.pid.lock() = None;
                    let settled = if inner.stopping.load(Ordering::SeqCst) {
                        StableState::Stopped
                    } else {
                        tracing::warn!(status = %output.status, "process exited unexpectedly");
                        StableState::Offline
                    };
                    monitor.state(settled);
                }
                Err(e) => {
                    *inner.pid.lock() = None;
                    monitor.error(format!("wait failed: {e}"));
                }
            }
        });

        monitor.state(StableState::Running);
        Ok(())
    }

    async fn stop(&self, opts: ActionOpts) -> Result<(), InteriorError> {
        let Some(pid) = *self.inner.pid.lock() else {
            // Nothing supervised — treat as already stopped.
            self.monitor.state(StableState::Stopped);
            return Ok(());
        };
        self.inner.stopping.store(true, Ordering::SeqCst);
        let signal = if opts.force { "-KILL" } else { "-TERM" };
        let status = Command::new("kill")
            .arg(signal)
            .arg(pid.to_string())
            .status()
            .await
            .map_err(|e| InteriorError::Failed(format!("kill failed: {e}")))?;
        if !status.success() {
            return Err(InteriorError::Failed(format!("kill -{pid} exited with {status}")));
        }
        // Settlement arrives from the reaper task once the process actually exits.
        Ok(())
    }

    async fn status(&self, _opts: ActionOpts) -> Result<(), InteriorError> {
        let pid = *self.inner.pid.lock();
        self.monitor.status(serde_json::json!({"pid": pid, "running": pid.is_some()}));
        Ok(())
    }
}

/// Builds [`ProcessInterior`]s from `{"command": "...", "cwd": "...", "env": [...]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessFactory;

impl InteriorFactory for ProcessFactory {
    fn kind(&self) -> &'static str {
        "process"
    }

    fn create(&self, _id: &ContainerId, config: &Value, monitor: Monitor) -> Result<Arc<dyn Interior>, String> {
        let config: ProcessConfig = serde_json::from_value(config.clone())
            .map_err(|e| format!("invalid process config: {e}"))?;
        Ok(Arc::new(ProcessInterior::new(config, monitor)))
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
