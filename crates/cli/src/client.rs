// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DaemonClient`: a single-request-per-connection client over the daemon's
//! Unix socket.
//!
//! Grounded on the teacher's `client_queries.rs` idiom — one method per
//! request variant, `self.send(&request).await?` then a `match` peeling off
//! the expected response variant and routing anything else through
//! [`DaemonClient::reject`].

use corral_core::{BroadcastEvent, ContainerId, EngineError, State, StableState};
use corral_daemon::env;
use corral_daemon::protocol::{self, Request, Response};
use serde_json::Value;
use thiserror::Error;
use tokio::net::UnixStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to the daemon at {path}: {source}")]
    Connect { path: String, source: std::io::Error },
    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),
    #[error("daemon returned an unexpected response: {0:?}")]
    UnexpectedResponse(Response),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub struct DaemonClient {
    socket_path: std::path::PathBuf,
}

impl DaemonClient {
    pub fn connect_default() -> Result<Self, ClientError> {
        let state_dir = env::state_dir().map_err(|e| ClientError::Connect {
            path: "<unresolved>".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
        })?;
        Ok(Self { socket_path: state_dir.join("corrald.sock") })
    }

    async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut stream = UnixStream::connect(&self.socket_path).await.map_err(|source| ClientError::Connect {
            path: self.socket_path.display().to_string(),
            source,
        })?;
        let timeout = env::ipc_timeout();
        protocol::write_request(&mut stream, request, timeout).await?;
        let response = protocol::read_response(&mut stream, timeout).await?;
        if let Response::Error { error } = response {
            return Err(ClientError::Engine(error));
        }
        Ok(response)
    }

    fn reject<T>(other: Response) -> Result<T, ClientError> {
        Err(ClientError::UnexpectedResponse(other))
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello { version: env!("CARGO_PKG_VERSION").to_string(), token: None };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            other => Self::reject(other),
        }
    }

    pub async fn create(&self, id: ContainerId, conf: Value) -> Result<(), ClientError> {
        match self.send(&Request::ContainerCreate { id, conf }).await? {
            Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn start(&self, id: ContainerId) -> Result<(), ClientError> {
        match self.send(&Request::ContainerStart { id }).await? {
            Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn stop(&self, id: ContainerId, force: bool) -> Result<(), ClientError> {
        match self.send(&Request::ContainerStop { id, force }).await? {
            Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn destroy(&self, id: ContainerId) -> Result<(), ClientError> {
        match self.send(&Request::ContainerDestroy { id }).await? {
            Response::Ok => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn query(&self, id: ContainerId) -> Result<ContainerSnapshot, ClientError> {
        match self.send(&Request::ContainerQuery { id }).await? {
            Response::ContainerSnapshot { id, state, interior_state, status } => {
                Ok(ContainerSnapshot { id, state, interior_state, status })
            }
            other => Self::reject(other),
        }
    }

    pub async fn list(&self) -> Result<Vec<ContainerId>, ClientError> {
        match self.send(&Request::ContainerList).await? {
            Response::ContainerIds { ids } => Ok(ids),
            other => Self::reject(other),
        }
    }

    pub async fn shutdown(&self, kill: bool) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown { kill }).await? {
            Response::Ok | Response::ShuttingDown => Ok(()),
            other => Self::reject(other),
        }
    }

    /// Opens a dedicated connection in broadcast-push mode, calling `on_event`
    /// for every frame until the connection closes or `on_event` returns
    /// `false`.
    pub async fn monitor(&self, mut on_event: impl FnMut(BroadcastEvent) -> bool) -> Result<(), ClientError> {
        let mut stream = UnixStream::connect(&self.socket_path).await.map_err(|source| ClientError::Connect {
            path: self.socket_path.display().to_string(),
            source,
        })?;
        protocol::write_request(&mut stream, &Request::Monitor, env::ipc_timeout()).await?;

        loop {
            let response = match protocol::read_response(&mut stream, std::time::Duration::from_secs(3600)).await {
                Ok(r) => r,
                Err(protocol::ProtocolError::ConnectionClosed) => return Ok(()),
                Err(e) => return Err(e.into()),
            };
            match response {
                Response::Broadcast { event } => {
                    if !on_event(event) {
                        return Ok(());
                    }
                }
                other => return Self::reject(other),
            }
        }
    }
}

pub struct ContainerSnapshot {
    pub id: ContainerId,
    pub state: State,
    pub interior_state: StableState,
    pub status: Option<Value>,
}
