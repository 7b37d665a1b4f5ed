// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire framing: 4-byte big-endian length prefix + JSON payload.
//!
//! Grounded on the teacher's `protocol` module doc comment ("Wire format:
//! 4-byte length prefix (big-endian) + JSON payload"); the concrete framing
//! implementation here is original since the teacher's own `wire.rs` wasn't
//! part of the retrieved pack.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{Request, Response};

/// Frames larger than this are rejected outright — a malformed or hostile
/// length prefix should never cause an unbounded allocation.
const MAX_FRAME_BYTES: u32 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection closed")]
    ConnectionClosed,
    #[error("read/write timed out")]
    Timeout,
    #[error("frame of {0} bytes exceeds the {MAX_FRAME_BYTES} byte limit")]
    FrameTooLarge(u32),
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize `value` to its length-prefixed wire representation.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    let body = serde_json::to_vec(value)?;
    let len = u32::try_from(body.len()).map_err(|_| ProtocolError::FrameTooLarge(u32::MAX))?;
    let mut framed = Vec::with_capacity(4 + body.len());
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(&body);
    Ok(framed)
}

/// Deserialize a single length-prefixed frame already read off the wire.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(body)?)
}

async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R, timeout: Duration) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    match tokio::time::timeout(timeout, reader.read_exact(&mut len_buf)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed)
        }
        Ok(Err(e)) => return Err(ProtocolError::Io(e)),
        Err(_) => return Err(ProtocolError::Timeout),
    }
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_BYTES {
        return Err(ProtocolError::FrameTooLarge(len));
    }
    let mut body = vec![0u8; len as usize];
    match tokio::time::timeout(timeout, reader.read_exact(&mut body)).await {
        Ok(Ok(())) => Ok(body),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(ProtocolError::ConnectionClosed),
        Ok(Err(e)) => Err(ProtocolError::Io(e)),
        Err(_) => Err(ProtocolError::Timeout),
    }
}

async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    bytes: &[u8],
    timeout: Duration,
) -> Result<(), ProtocolError> {
    match tokio::time::timeout(timeout, writer.write_all(bytes)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ProtocolError::Io(e)),
        Err(_) => Err(ProtocolError::Timeout),
    }
}

pub async fn read_request<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Request, ProtocolError> {
    let body = read_frame(reader, timeout).await?;
    decode(&body)
}

pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    let framed = encode(response)?;
    write_frame(writer, &framed, timeout).await
}

/// Client-side counterpart of [`write_response`]: sends a `Request` frame.
pub async fn write_request<W: AsyncWrite + Unpin>(
    writer: &mut W,
    request: &Request,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    let framed = encode(request)?;
    write_frame(writer, &framed, timeout).await
}

/// Client-side counterpart of [`read_request`]: reads a `Response` frame.
pub async fn read_response<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Response, ProtocolError> {
    let body = read_frame(reader, timeout).await?;
    decode(&body)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
