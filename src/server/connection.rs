// src/server/connection.rs

//! Per-connection handler.
//!
//! Inbound bytes are buffered and split into newline-delimited messages by
//! [`LineFramer`]. Each complete message is validated by
//! [`parse_message`] and routed:
//! - `status`: the snapshot is written back as one JSON line and the
//!   connection stays open;
//! - `run`: the command is handed to the runtime and the connection closes,
//!   without a response.
//!
//! Whatever is left in the buffer when the peer half-closes is treated as a
//! final message, so a client may also send a single unterminated object.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::engine::RuntimeHandle;
use crate::errors::Result;
use crate::events::{EventBus, ServerEvent};
use crate::server::message::{parse_message, ClientMessage};

const READ_CHUNK: usize = 4096;

/// Everything a connection handler needs, shared by all connections.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub bus: Arc<EventBus>,
    pub runtime: RuntimeHandle,
    pub idle_timeout: Option<Duration>,
    pub max_message_bytes: usize,
}

/// What to do with the connection after a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    KeepOpen,
    Close,
}

/// Accumulates bytes and yields complete `\n`-terminated messages.
#[derive(Debug)]
pub struct LineFramer {
    buf: Vec<u8>,
    max_message_bytes: usize,
}

/// The pending message grew past the configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTooLarge {
    pub limit: usize,
}

impl LineFramer {
    pub fn new(max_message_bytes: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_message_bytes,
        }
    }

    /// Append `data` and return every message it completed, in order.
    ///
    /// Blank lines are skipped; surrounding whitespace (including `\r`) is
    /// trimmed.
    pub fn push(&mut self, data: &[u8]) -> std::result::Result<Vec<Vec<u8>>, MessageTooLarge> {
        self.buf.extend_from_slice(data);

        let mut messages = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(message) = trimmed(&line) {
                messages.push(message);
            }
        }

        if self.buf.len() > self.max_message_bytes {
            self.buf.clear();
            return Err(MessageTooLarge {
                limit: self.max_message_bytes,
            });
        }

        Ok(messages)
    }

    /// Take whatever is left once the peer stopped sending.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        let rest = std::mem::take(&mut self.buf);
        trimmed(&rest)
    }
}

fn trimmed(bytes: &[u8]) -> Option<Vec<u8>> {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace())?;
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace())?;
    Some(bytes[start..=end].to_vec())
}

/// Serve one client connection until either side closes it.
///
/// Validation failures are reported on the bus and never returned as
/// errors; `Err` means the transport failed or the runtime is gone.
pub async fn handle_connection<S>(mut stream: S, ctx: &ConnectionContext) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut framer = LineFramer::new(ctx.max_message_bytes);
    let mut chunk = vec![0u8; READ_CHUNK];

    'conn: loop {
        let read = match ctx.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, stream.read(&mut chunk)).await {
                Ok(read) => read,
                Err(_) => {
                    ctx.bus.emit(ServerEvent::error(format!(
                        "Client idle for {limit:?}; closing connection"
                    )));
                    break 'conn;
                }
            },
            None => stream.read(&mut chunk).await,
        };
        let n = read?;

        if n == 0 {
            if let Some(message) = framer.finish() {
                handle_message(&mut stream, &message, ctx).await?;
            }
            break 'conn;
        }

        ctx.bus.emit(ServerEvent::ClientDataReceived {
            data: chunk[..n].to_vec(),
        });

        let messages = match framer.push(&chunk[..n]) {
            Ok(messages) => messages,
            Err(MessageTooLarge { limit }) => {
                ctx.bus.emit(ServerEvent::error(format!(
                    "Message exceeds {limit} bytes without a newline; closing connection"
                )));
                break 'conn;
            }
        };

        for message in messages {
            if handle_message(&mut stream, &message, ctx).await? == Flow::Close {
                break 'conn;
            }
        }
    }

    // The peer may already be gone; nothing left to report.
    let _ = stream.shutdown().await;
    Ok(())
}

/// Validate and route a single message.
pub async fn handle_message<S>(stream: &mut S, bytes: &[u8], ctx: &ConnectionContext) -> Result<Flow>
where
    S: AsyncWrite + Unpin,
{
    let message = match parse_message(bytes) {
        Ok(message) => message,
        Err(err) => {
            debug!(error = %err, "rejecting client message");
            let flow = if err.closes_connection() {
                Flow::Close
            } else {
                Flow::KeepOpen
            };
            ctx.bus.emit(ServerEvent::error(err.to_string()));
            return Ok(flow);
        }
    };

    ctx.bus.emit(ServerEvent::ProcessingMessage {
        kind: message.kind(),
    });

    match message {
        ClientMessage::Status => {
            let status = ctx.runtime.status().await?;
            let mut json = match status.to_json() {
                Ok(json) => json,
                Err(err) => {
                    ctx.bus.emit(ServerEvent::error(err.to_string()));
                    return Ok(Flow::KeepOpen);
                }
            };
            json.push('\n');

            if let Err(err) = write_all_flush(stream, json.as_bytes()).await {
                ctx.bus.emit(ServerEvent::error(format!(
                    "Failed to write status response: {err}"
                )));
                return Ok(Flow::Close);
            }
            Ok(Flow::KeepOpen)
        }
        ClientMessage::Run { cmd } => {
            let submission = ctx.runtime.submit(cmd).await?;
            debug!(?submission, "run request processed");
            Ok(Flow::Close)
        }
    }
}

async fn write_all_flush<S>(stream: &mut S, bytes: &[u8]) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(bytes).await?;
    stream.flush().await
}
