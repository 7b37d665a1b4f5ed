// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `corral`: CLI client for the container lifecycle daemon.

mod client;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use client::DaemonClient;
use corral_core::ContainerId;
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "corral", about = "Container lifecycle engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format for commands that print structured data.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new container and spawn its lifecycle engine at `offline`.
    Create {
        id: String,
        /// Interior config as a JSON object, e.g. '{"kind":"process","cmd":"sleep","args":["30"]}'.
        conf: String,
    },
    /// Drive a container toward `running`.
    Start { id: String },
    /// Drive a container toward `stopped`.
    Stop {
        id: String,
        /// Skip graceful shutdown and force-kill the interior.
        #[arg(long)]
        force: bool,
    },
    /// Drive a container toward `offline` and evict it from the registry.
    Destroy { id: String },
    /// Print a single container's current state and interior status.
    Info { id: String },
    /// List every registered container id.
    List,
    /// Stream broadcast events until interrupted.
    Monitor,
    /// Daemon process control.
    #[command(subcommand)]
    Daemon(DaemonCommand),
}

#[derive(Subcommand)]
enum DaemonCommand {
    /// Start `corrald` in the background if it isn't already running.
    Start,
    /// Check whether the daemon is reachable.
    Status,
    /// Ask the daemon to shut down.
    Stop {
        /// Force-kill instead of draining in-flight work.
        #[arg(long)]
        kill: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("corral: {e}");
        std::process::exit(e.code);
    }
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    let client = DaemonClient::connect_default().map_err(|e| ExitError::new(1, e.to_string()))?;

    match cli.command {
        Command::Create { id, conf } => {
            let conf: serde_json::Value =
                serde_json::from_str(&conf).map_err(|e| ExitError::new(2, format!("invalid config JSON: {e}")))?;
            client.create(ContainerId::from(id), conf).await.map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        Command::Start { id } => {
            client.start(ContainerId::from(id)).await.map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        Command::Stop { id, force } => {
            client.stop(ContainerId::from(id), force).await.map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        Command::Destroy { id } => {
            client.destroy(ContainerId::from(id)).await.map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        Command::Info { id } => {
            let snapshot = client.query(ContainerId::from(id)).await.map_err(|e| ExitError::new(1, e.to_string()))?;
            output::print_snapshot(&snapshot, cli.format).map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        Command::List => {
            let ids = client.list().await.map_err(|e| ExitError::new(1, e.to_string()))?;
            output::print_ids(&ids, cli.format).map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        Command::Monitor => {
            client
                .monitor(|event| {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{line}"),
                        Err(e) => eprintln!("corral: failed to encode event: {e}"),
                    }
                    true
                })
                .await
                .map_err(|e| ExitError::new(1, e.to_string()))?;
        }
        Command::Daemon(DaemonCommand::Start) => daemon_start(&client).await?,
        Command::Daemon(DaemonCommand::Status) => match client.ping().await {
            Ok(()) => {
                let version = client.hello().await.unwrap_or_else(|_| "unknown".to_string());
                println!("Status: running");
                println!("Version: {version}");
            }
            Err(_) => println!("Daemon not running"),
        },
        Command::Daemon(DaemonCommand::Stop { kill }) => match client.shutdown(kill).await {
            Ok(()) => println!("Daemon stopped"),
            Err(_) => println!("Daemon not running"),
        },
    }

    Ok(())
}

/// Starts `corrald` detached in the background, unless it is already
/// reachable. Grounded on the teacher's `daemon start` command: find the
/// sibling binary, spawn it with stdio detached from the terminal, then
/// poll `ping` until the socket is accepting connections or the grace
/// period runs out.
async fn daemon_start(client: &DaemonClient) -> Result<(), ExitError> {
    if client.ping().await.is_ok() {
        println!("Daemon already running");
        return Ok(());
    }

    let corrald_path = find_corrald_binary();
    std::process::Command::new(&corrald_path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ExitError::new(1, format!("failed to spawn {}: {e}", corrald_path.display())))?;

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while std::time::Instant::now() < deadline {
        if client.ping().await.is_ok() {
            println!("Daemon started");
            return Ok(());
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    Err(ExitError::new(1, "daemon did not become reachable within the startup grace period".to_string()))
}

/// Looks for `corrald` next to the running `corral` binary first (so a
/// debug build picks up its own freshly-built daemon), falling back to
/// `$PATH`.
fn find_corrald_binary() -> std::path::PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("corrald");
            if sibling.exists() {
                return sibling;
            }
        }
    }
    std::path::PathBuf::from("corrald")
}
