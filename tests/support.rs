//! Black-box test harness for the `corral`/`corrald` binaries.
//!
//! Grounded on the teacher's `Project`/`wait_for` integration-test style:
//! each test gets an isolated `CORRAL_STATE_DIR`, spawns a real `corrald`
//! child process, and drives it exclusively through the `corral` CLI.

use assert_cmd::cargo::CommandCargoExt;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

pub const WAIT_MAX_MS: u64 = 5_000;

pub struct Harness {
    state_dir: tempfile::TempDir,
    daemon: Child,
}

impl Harness {
    /// Starts a fresh `corrald` against a throwaway state directory and
    /// blocks until its Unix socket is accepting connections.
    pub fn start() -> Self {
        let state_dir = tempfile::tempdir().expect("tempdir");
        let mut cmd = Command::cargo_bin("corrald").expect("corrald binary should be built");
        cmd.env("CORRAL_STATE_DIR", state_dir.path())
            .env("CORRAL_IPC_TIMEOUT_MS", "2000")
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        let daemon = cmd.spawn().expect("corrald should spawn");

        let harness = Self { state_dir, daemon };
        let ready = wait_for(WAIT_MAX_MS, || harness.socket_path().exists());
        assert!(ready, "corrald should create its socket within {WAIT_MAX_MS}ms");
        harness
    }

    fn socket_path(&self) -> PathBuf {
        self.state_dir.path().join("corrald.sock")
    }

    /// A `corral` invocation pre-wired to this harness's state directory.
    pub fn corral(&self) -> Command {
        let mut cmd = Command::cargo_bin("corral").expect("corral binary should be built");
        cmd.env("CORRAL_STATE_DIR", self.state_dir.path()).env("CORRAL_IPC_TIMEOUT_MS", "2000");
        cmd
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = self.corral().args(["daemon", "stop", "--kill"]).output();
        let _ = self.daemon.kill();
        let _ = self.daemon.wait();
    }
}

/// Polls `predicate` at a short interval until it returns `true` or
/// `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}
