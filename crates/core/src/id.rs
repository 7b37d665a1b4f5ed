// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container identifier.
//!
//! Unlike daemon-generated IDs in other systems, a container's `id` is
//! supplied by the caller at `create` time (see `container.create` in the
//! wire protocol) — the registry never mints one. `ContainerId` is a thin
//! newtype over the caller's string so it can be used as a map key and moved
//! around cheaply without an allocation in the common (short id) case.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

/// Opaque container identifier, unique within one registry instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(SmolStr);

impl ContainerId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<String> for ContainerId {
    fn from(s: String) -> Self {
        Self(SmolStr::new(s))
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for ContainerId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq<str> for ContainerId {
    fn eq(&self, other: &str) -> bool {
        self.0.as_str() == other
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
