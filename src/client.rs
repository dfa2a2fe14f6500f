// src/client.rs

//! Client side of the control channel, used by the `status` and `run`
//! subcommands.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use crate::errors::{PoolError, Result};
use crate::server::ClientMessage;
use crate::status::Status;

#[derive(Debug, Clone)]
pub struct Client {
    uri: String,
    timeout: Duration,
}

impl Client {
    pub fn new(uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            uri: uri.into(),
            timeout,
        }
    }

    /// Ask the daemon for its current status.
    pub async fn fetch_status(&self) -> Result<Status> {
        with_timeout(self.timeout, async {
            let stream = TcpStream::connect(&self.uri).await?;
            let (read_half, mut write_half) = stream.into_split();

            let line = ClientMessage::Status.to_line()?;
            write_half.write_all(line.as_bytes()).await?;
            write_half.flush().await?;

            let mut lines = BufReader::new(read_half).lines();
            let reply = lines.next_line().await?.ok_or_else(|| {
                PoolError::Protocol("server closed the connection without a status reply".to_string())
            })?;
            debug!(%reply, "status reply received");

            Status::from_json(&reply)
        })
        .await
    }

    /// Submit `cmd` for execution.
    ///
    /// Returns once the daemon has closed the connection, i.e. after the
    /// request was processed. No outcome is reported back.
    pub async fn run(&self, cmd: &str) -> Result<()> {
        with_timeout(self.timeout, async {
            let mut stream = TcpStream::connect(&self.uri).await?;

            let line = ClientMessage::Run {
                cmd: cmd.to_string(),
            }
            .to_line()?;
            stream.write_all(line.as_bytes()).await?;
            stream.shutdown().await?;

            let mut rest = Vec::new();
            stream.read_to_end(&mut rest).await?;
            Ok::<(), PoolError>(())
        })
        .await
    }
}

async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| PoolError::Protocol(format!("no answer from server within {limit:?}")))?
}
