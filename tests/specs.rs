//! Black-box scenarios against the built `corral`/`corrald` binaries,
//! exercising `spec.md` §8's scenarios S3 and S5 at the CLI/daemon level
//! (S1/S2/S4/S6 are covered at the engine unit-test level instead — they
//! depend on a scriptable interior that isn't wired into the production
//! `corrald` binary).

#[path = "support.rs"]
mod support;

use assert_cmd::prelude::*;
use support::{wait_for, Harness};

fn sleeper_conf() -> String {
    serde_json::json!({"kind": "process", "command": "sleep 30"}).to_string()
}

#[test]
fn daemon_lifecycle_start_status_stop() {
    let harness = Harness::start();

    let status = harness.corral().args(["daemon", "status"]).output().expect("daemon status should run");
    assert!(String::from_utf8_lossy(&status.stdout).contains("Status: running"));

    let stop = harness.corral().args(["daemon", "stop"]).output().expect("daemon stop should run");
    assert!(String::from_utf8_lossy(&stop.stdout).contains("Daemon stopped"));

    let stopped = wait_for(support::WAIT_MAX_MS, || {
        harness
            .corral()
            .args(["daemon", "status"])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains("not running"))
            .unwrap_or(false)
    });
    assert!(stopped, "daemon should report not running after stop");
}

#[test]
fn create_then_list_shows_the_new_container() {
    let harness = Harness::start();

    harness.corral().args(["create", "a", &sleeper_conf()]).assert().success();

    let listed = wait_for(support::WAIT_MAX_MS, || {
        harness
            .corral()
            .args(["list"])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains('a'))
            .unwrap_or(false)
    });
    assert!(listed, "a freshly created container should appear in `corral list`");
}

#[test]
fn creating_the_same_id_twice_is_an_error() {
    let harness = Harness::start();

    harness.corral().args(["create", "dup", &sleeper_conf()]).assert().success();
    harness.corral().args(["create", "dup", &sleeper_conf()]).assert().failure();
}

/// S1-shaped happy path reachable through the process interior: create at
/// `offline`, `start` drives it straight to `running` (process has no
/// distinct loaded state), then `stop` settles it back at `stopped`.
#[test]
fn start_then_stop_reaches_running_then_stopped() {
    let harness = Harness::start();
    harness.corral().args(["create", "web", &sleeper_conf()]).assert().success();
    harness.corral().args(["start", "web"]).assert().success();

    let running = wait_for(support::WAIT_MAX_MS, || {
        harness
            .corral()
            .args(["info", "web"])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains("running"))
            .unwrap_or(false)
    });
    assert!(running, "container should reach running after start");

    harness.corral().args(["stop", "web"]).assert().success();
    let stopped = wait_for(support::WAIT_MAX_MS, || {
        harness
            .corral()
            .args(["info", "web"])
            .output()
            .map(|o| {
                let out = String::from_utf8_lossy(&o.stdout);
                out.contains("stopped") && !out.contains("running")
            })
            .unwrap_or(false)
    });
    assert!(stopped, "container should settle at stopped after stop");
}

/// S5: list reflects registered ids, and a destroyed container is evicted
/// once it actually lands at `offline`.
#[test]
fn destroy_evicts_the_container_once_settled() {
    let harness = Harness::start();
    for id in ["a", "b", "c"] {
        harness.corral().args(["create", id, &sleeper_conf()]).assert().success();
    }

    let all_listed = wait_for(support::WAIT_MAX_MS, || {
        harness
            .corral()
            .args(["list"])
            .output()
            .map(|o| {
                let out = String::from_utf8_lossy(&o.stdout);
                out.contains('a') && out.contains('b') && out.contains('c')
            })
            .unwrap_or(false)
    });
    assert!(all_listed);

    harness.corral().args(["destroy", "b"]).assert().success();

    let evicted = wait_for(support::WAIT_MAX_MS, || {
        harness
            .corral()
            .args(["list"])
            .output()
            .map(|o| !String::from_utf8_lossy(&o.stdout).contains('b'))
            .unwrap_or(false)
    });
    assert!(evicted, "destroyed container should be evicted from `corral list`");
}

#[test]
fn querying_an_unknown_id_fails() {
    let harness = Harness::start();
    harness.corral().args(["info", "ghost"]).assert().failure();
}
