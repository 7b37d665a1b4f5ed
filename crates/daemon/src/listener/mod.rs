// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task: accepts connections and dispatches each request against
//! the registry without blocking other connections.
//!
//! Grounded on the teacher's `listener/mod.rs` — same dual Unix/TCP accept
//! loop, the same `Hello`-gated TCP auth handshake, the same per-connection
//! spawned task shape. Simplified here to the single request/response
//! exchange `spec.md` needs; the teacher's client-disconnect race and
//! connection-upgrading (attach) machinery aren't part of this domain.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, UnixListener};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::env::{ipc_timeout, PROTOCOL_VERSION};
use crate::event_bus::EventBus;
use crate::protocol::{self, Request, Response};
use crate::registry::Registry;

/// Shared daemon context handed to every connection handler.
pub struct ListenCtx {
    pub registry: Registry,
    pub bus: EventBus,
    pub state_dir: PathBuf,
    pub shutdown: Arc<Notify>,
    /// Bearer token required on TCP connections (`CORRAL_AUTH_TOKEN`).
    pub auth_token: Option<String>,
}

pub struct Listener {
    unix: UnixListener,
    tcp: Option<TcpListener>,
    ctx: Arc<ListenCtx>,
}

#[derive(Debug, Error)]
pub(crate) enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionSource {
    Unix,
    Tcp,
}

impl Listener {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, tcp: None, ctx }
    }

    pub fn with_tcp(unix: UnixListener, tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, tcp: Some(tcp), ctx }
    }

    pub async fn run(self) {
        match self.tcp {
            Some(tcp) => self.run_dual(tcp).await,
            None => self.run_unix_only().await,
        }
    }

    async fn run_unix_only(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => self.spawn_handler(stream, ConnectionSource::Unix),
                Err(e) => error!("Unix accept error: {e}"),
            }
        }
    }

    async fn run_dual(self, tcp: TcpListener) {
        loop {
            tokio::select! {
                result = self.unix.accept() => {
                    match result {
                        Ok((stream, _)) => self.spawn_handler(stream, ConnectionSource::Unix),
                        Err(e) => error!("Unix accept error: {e}"),
                    }
                }
                result = tcp.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!("TCP connection from {addr}");
                            self.spawn_handler(stream, ConnectionSource::Tcp);
                        }
                        Err(e) => error!("TCP accept error: {e}"),
                    }
                }
            }
        }
    }

    fn spawn_handler<S>(&self, stream: S, source: ConnectionSource)
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let ctx = Arc::clone(&self.ctx);
        tokio::spawn(async move {
            let (mut reader, mut writer) = tokio::io::split(stream);
            if let Err(e) = handle_connection(&mut reader, &mut writer, source, &ctx).await {
                match e {
                    ConnectionError::Protocol(protocol::ProtocolError::ConnectionClosed) => {
                        debug!("client disconnected")
                    }
                    ConnectionError::Protocol(protocol::ProtocolError::Timeout) => warn!("connection timeout"),
                    other => error!("connection error: {other}"),
                }
            }
        });
    }
}

async fn handle_connection<R, W>(
    reader: &mut R,
    writer: &mut W,
    source: ConnectionSource,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + AsyncReadExt + Unpin,
    W: AsyncWrite + AsyncWriteExt + Unpin,
{
    let request = protocol::read_request(reader, ipc_timeout()).await?;

    if source == ConnectionSource::Tcp {
        if let Request::Hello { ref token, .. } = request {
            if let Some(expected) = &ctx.auth_token {
                if token.as_deref() != Some(expected.as_str()) {
                    let response = Response::error(corral_core::EngineError::Unauthorized {
                        reason: "token mismatch".into(),
                    });
                    let _ = protocol::write_response(writer, &response, ipc_timeout()).await;
                    return Ok(());
                }
            }
        } else {
            let response = Response::error(corral_core::EngineError::Unauthorized {
                reason: "TCP connections must start with Hello".into(),
            });
            let _ = protocol::write_response(writer, &response, ipc_timeout()).await;
            return Ok(());
        }
    }

    if matches!(request, Request::ContainerQuery { .. } | Request::ContainerList) {
        debug!(request = ?request, "received query");
    } else {
        info!(request = ?request, "received request");
    }

    if matches!(request, Request::Monitor) {
        return handle_monitor(writer, ctx).await;
    }

    let response = handle_request(request, ctx).await;
    protocol::write_response(writer, &response, ipc_timeout()).await?;
    Ok(())
}

/// Subscribes this connection to the bus and pushes every broadcast frame
/// until the client disconnects, backing the CLI's `monitor` subcommand.
async fn handle_monitor<W: AsyncWrite + AsyncWriteExt + Unpin>(
    writer: &mut W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError> {
    let mut subscription = ctx.bus.subscribe();
    loop {
        match subscription.recv().await {
            Ok(event) => {
                let response = Response::Broadcast { event };
                if protocol::write_response(writer, &response, ipc_timeout()).await.is_err() {
                    return Ok(());
                }
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => return Ok(()),
        }
    }
}

async fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Ping => Response::Pong,
        Request::Hello { .. } => Response::Hello { version: PROTOCOL_VERSION.to_string() },
        Request::Shutdown { kill: _ } => {
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }
        Request::Monitor => unreachable!("handled by handle_monitor before dispatch"),

        Request::ContainerCreate { id, conf } => match ctx.registry.create(id, conf) {
            Ok(()) => Response::Ok,
            Err(error) => Response::error(error),
        },
        Request::ContainerStart { id } => match ctx.registry.start(&id) {
            Ok(()) => Response::Ok,
            Err(error) => Response::error(error),
        },
        Request::ContainerStop { id, force } => match ctx.registry.stop(&id, force) {
            Ok(()) => Response::Ok,
            Err(error) => Response::error(error),
        },
        Request::ContainerDestroy { id } => match ctx.registry.destroy(&id) {
            Ok(()) => Response::Ok,
            Err(error) => Response::error(error),
        },
        Request::ContainerQuery { id } => match ctx.registry.query(&id).await {
            Ok(snapshot) => Response::ContainerSnapshot {
                id: snapshot.id,
                state: snapshot.state,
                interior_state: snapshot.interior_state,
                status: snapshot.status,
            },
            Err(error) => Response::error(error),
        },
        Request::ContainerList => Response::ContainerIds { ids: ctx.registry.list() },
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
