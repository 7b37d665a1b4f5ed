// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `corrald`: the container lifecycle daemon binary.

use std::sync::Arc;

use corral_adapters::{DockerFactory, ProcessFactory};
use corral_daemon::{env, EventBus, ListenCtx, Listener, RegistryBuilder};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Notify;
use tracing::{error, info};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SOCKET_NAME: &str = "corrald.sock";

#[tokio::main]
async fn main() {
    let state_dir = match env::state_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("corrald: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::create_dir_all(&state_dir) {
        eprintln!("corrald: failed to create state dir {}: {e}", state_dir.display());
        std::process::exit(1);
    }

    let _log_guard = setup_logging(&state_dir);

    let socket_path = state_dir.join(SOCKET_NAME);
    let _ = std::fs::remove_file(&socket_path);
    let unix = match UnixListener::bind(&socket_path) {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind Unix socket at {}: {e}", socket_path.display());
            std::process::exit(1);
        }
    };
    info!(path = %socket_path.display(), "listening on Unix socket");

    let tcp = match env::tcp_port() {
        Some(port) => match TcpListener::bind(("0.0.0.0", port)).await {
            Ok(listener) => {
                info!(port, "listening on TCP");
                Some(listener)
            }
            Err(e) => {
                error!("failed to bind TCP port {port}: {e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let bus = EventBus::new();
    let registry = RegistryBuilder::new()
        .with_factory(Arc::new(ProcessFactory))
        .with_factory(Arc::new(DockerFactory))
        .build(bus.clone());

    let shutdown = Arc::new(Notify::new());
    let ctx = Arc::new(ListenCtx {
        registry,
        bus,
        state_dir: state_dir.clone(),
        shutdown: shutdown.clone(),
        auth_token: env::auth_token(),
    });

    let listener = match tcp {
        Some(tcp) => Listener::with_tcp(unix, tcp, ctx),
        None => Listener::new(unix, ctx),
    };

    tokio::select! {
        () = listener.run() => {}
        _ = shutdown.notified() => {
            info!("shutdown requested over the wire");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested by signal");
        }
    }

    tokio::time::timeout(env::drain_timeout(), tokio::time::sleep(std::time::Duration::from_millis(50)))
        .await
        .ok();
    let _ = std::fs::remove_file(&socket_path);
    info!("corrald exiting");
}

/// Sets up a daily-rolling file log under `{state_dir}/logs`, mirrored to
/// stderr. The returned guard must stay alive for the process lifetime —
/// dropping it stops the non-blocking writer's flush thread.
fn setup_logging(state_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = state_dir.join("logs");
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "corrald.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer.and(std::io::stderr)))
        .init();

    guard
}
