// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.
//!
//! Grounded on the teacher's `env.rs` — same resolution order, same default
//! fallbacks, renamed to the `CORRAL_*` namespace per `SPEC_FULL.md` §10.2.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Protocol version advertised in the `Hello` handshake response.
pub const PROTOCOL_VERSION: &str = "1";

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("could not determine a state directory: neither CORRAL_STATE_DIR, XDG_STATE_HOME, nor HOME is set")]
    NoStateDir,
}

/// Resolve state directory: `CORRAL_STATE_DIR` > `XDG_STATE_HOME`/corral > `~/.local/state/corral`.
pub fn state_dir() -> Result<PathBuf, EnvError> {
    if let Ok(dir) = std::env::var("CORRAL_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("corral"));
    }
    let home = std::env::var("HOME").map_err(|_| EnvError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/corral"))
}

/// Client round-trip timeout for a single request/response exchange.
pub fn ipc_timeout() -> Duration {
    std::env::var("CORRAL_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// TCP port for remote connections. When set, the daemon listens on this
/// port in addition to the Unix socket.
pub fn tcp_port() -> Option<u16> {
    std::env::var("CORRAL_TCP_PORT").ok().and_then(|s| s.parse::<u16>().ok())
}

/// Bearer token required on TCP connections. Validated during the `Hello` handshake.
pub fn auth_token() -> Option<String> {
    std::env::var("CORRAL_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Graceful-shutdown drain window.
pub fn drain_timeout() -> Duration {
    std::env::var("CORRAL_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
