// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete `Interior` implementations.
//!
//! Every backend here wraps a config blob from `container.create`'s `conf`
//! field and a [`Monitor`](corral_engine::interior::Monitor) handed to it at
//! construction time, per `crates/engine/src/interior.rs`'s contract.

pub mod docker;
pub mod process;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use docker::{DockerFactory, DockerInterior};
pub use process::{ProcessFactory, ProcessInterior};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeCall, FakeFactory, FakeInterior};
