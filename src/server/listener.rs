// src/server/listener.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{ServerConfig, ShellConfig};
use crate::engine::{CommandRouter, Runtime, RuntimeEvent, RuntimeHandle};
use crate::errors::{PoolError, Result};
use crate::events::{EventBus, EventKind, Observer, ServerEvent};
use crate::exec::{ProcessLauncher, ShellLauncher};
use crate::server::connection::{handle_connection, ConnectionContext};

/// Capacity of the runtime event channel.
const RUNTIME_CHANNEL: usize = 64;

/// The control-channel daemon.
///
/// Observers are registered with [`Server::on`] before binding; once bound
/// the event bus is frozen and shared by the runtime and every connection.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    bus: EventBus,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            bus: EventBus::new(),
        }
    }

    pub fn on<O>(&mut self, kind: EventKind, observer: O) -> &mut Self
    where
        O: Observer + 'static,
    {
        self.bus.on(kind, observer);
        self
    }

    pub fn on_all<O>(&mut self, observer: O) -> &mut Self
    where
        O: Observer + Clone + 'static,
    {
        self.bus.on_all(observer);
        self
    }

    /// Bind and start serving, running commands through `shell`.
    pub async fn bind(self, shell: ShellConfig) -> Result<ServerHandle> {
        self.bind_with(|runtime_tx| ShellLauncher::new(runtime_tx, shell))
            .await
    }

    /// Bind and start serving with a custom launcher.
    ///
    /// `make_launcher` receives the runtime sender the launcher must report
    /// process exits to.
    pub async fn bind_with<L, F>(self, make_launcher: F) -> Result<ServerHandle>
    where
        L: ProcessLauncher + 'static,
        F: FnOnce(mpsc::Sender<RuntimeEvent>) -> L,
    {
        let listener = TcpListener::bind(&self.config.uri).await?;
        let local_addr = listener.local_addr()?;
        let started_at = Instant::now();

        let bus = Arc::new(self.bus);
        // Resolved address, so a configured port 0 reports the real port.
        bus.emit(ServerEvent::Listening {
            uri: local_addr.to_string(),
        });

        let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(RUNTIME_CHANNEL);
        let launcher = make_launcher(rt_tx.clone());
        let router = CommandRouter::new(Arc::clone(&bus), started_at);
        let runtime_task = tokio::spawn(Runtime::new(router, rt_rx, launcher).run());

        let runtime = RuntimeHandle::new(rt_tx);
        let ctx = ConnectionContext {
            bus,
            runtime: runtime.clone(),
            idle_timeout: self.config.idle_timeout,
            max_message_bytes: self.config.max_message_bytes,
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let accept_task = tokio::spawn(accept_loop(listener, ctx, shutdown_rx));

        info!(%local_addr, "procpool server listening");

        Ok(ServerHandle {
            local_addr,
            runtime,
            shutdown_tx,
            accept_task,
            runtime_task,
        })
    }
}

/// Handle to a bound, running server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    runtime: RuntimeHandle,
    shutdown_tx: watch::Sender<bool>,
    accept_task: JoinHandle<()>,
    runtime_task: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Direct access to the runtime, bypassing TCP.
    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    /// Stop accepting connections, stop the runtime and wait for both.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        // An already stopped runtime is fine here.
        let _ = self.runtime.shutdown().await;
        self.accept_task.await.map_err(anyhow::Error::from)?;
        self.runtime_task.await.map_err(anyhow::Error::from)?
    }

    /// Wait until the runtime stops on its own.
    pub async fn wait(&mut self) -> Result<()> {
        (&mut self.runtime_task)
            .await
            .map_err(|e| PoolError::Other(e.into()))?
    }
}

async fn accept_loop(
    listener: TcpListener,
    ctx: ConnectionContext,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            res = listener.accept() => match res {
                Ok((stream, peer)) => {
                    let ctx = ctx.clone();
                    tokio::spawn(async move {
                        let address = peer.to_string();
                        ctx.bus.emit(ServerEvent::ClientConnected { address: address.clone() });
                        if let Err(err) = handle_connection(stream, &ctx).await {
                            warn!(peer = %address, error = %err, "client connection failed");
                        }
                        ctx.bus.emit(ServerEvent::ClientDisconnected { address });
                    });
                }
                Err(err) => {
                    ctx.bus.emit(ServerEvent::error(format!("Failed to accept connection: {err}")));
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            },
            _ = shutdown.changed() => {
                info!("accept loop stopping");
                break;
            }
        }
    }
}
