// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use corral_core::ContainerId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request from a client to the daemon. One variant per `spec.md` §6
/// service-dispatch entry, plus the ambient `Ping`/`Hello`/`Shutdown` the
/// teacher's own protocol carries for every daemon it fronts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping.
    Ping,

    /// Version handshake. `token` is only inspected on TCP connections.
    Hello {
        version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },

    /// Request daemon shutdown.
    Shutdown {
        #[serde(default)]
        kill: bool,
    },

    /// `container.create` — `{id, conf}` → empty OK.
    ContainerCreate { id: ContainerId, conf: Value },

    /// `container.start` — `{id}` → empty OK.
    ContainerStart { id: ContainerId },

    /// `container.stop` — `{id, force?}` → empty OK.
    ContainerStop {
        id: ContainerId,
        #[serde(default)]
        force: bool,
    },

    /// `container.destroy` — `{id}` → empty OK.
    ContainerDestroy { id: ContainerId },

    /// `container.query` — `{id}` → snapshot.
    ContainerQuery { id: ContainerId },

    /// `container.list` — empty → `{ids}`.
    ContainerList,

    /// Subscribe this connection to pub/sub broadcasts instead of a single
    /// request/response exchange (backs the CLI's `monitor` subcommand).
    Monitor,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
