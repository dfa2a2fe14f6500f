// src/engine/runtime.rs

use std::fmt;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::errors::{PoolError, Result};
use crate::exec::ProcessLauncher;
use crate::status::Status;
use crate::types::ProcessOutcome;

use super::router::{CommandRouter, LaunchRequest, Submission};
use super::RuntimeEvent;

/// Actor that owns the [`CommandRouter`] and applies every `RuntimeEvent`
/// to it, one at a time.
///
/// Connection handlers and the launcher only ever talk to it through the
/// event channel, so the running set, queued set and counters are never
/// touched concurrently.
pub struct Runtime<L: ProcessLauncher> {
    router: CommandRouter,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    launcher: L,
}

impl<L: ProcessLauncher> fmt::Debug for Runtime<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

impl<L: ProcessLauncher> Runtime<L> {
    pub fn new(
        router: CommandRouter,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        launcher: L,
    ) -> Self {
        Self {
            router,
            event_rx,
            launcher,
        }
    }

    /// Main event loop. Returns when the channel closes or shutdown is
    /// requested.
    pub async fn run(mut self) -> Result<()> {
        info!("procpool runtime started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::RunRequested { cmd, reply } => {
                    let submission = self.router.submit(cmd);
                    if let Some(request) = submission.launch() {
                        self.launch(request.clone()).await;
                    }
                    // The requester may already have gone away.
                    let _ = reply.send(submission);
                }
                RuntimeEvent::StatusRequested { reply } => {
                    let _ = reply.send(self.router.status());
                }
                RuntimeEvent::ProcessExited { id, cmd, outcome } => {
                    if let Some(request) = self.router.handle_exit(&id, &cmd, outcome) {
                        self.launch(request).await;
                    }
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    /// Hand `request` to the launcher. A launcher error is recorded as a
    /// spawn failure so the running entry does not leak.
    async fn launch(&mut self, request: LaunchRequest) {
        let mut next = Some(request);

        while let Some(request) = next.take() {
            if let Err(err) = self.launcher.launch(request.clone()).await {
                warn!(cmd = %request.cmd, error = %err, "launcher rejected command");
                next = self.router.handle_exit(
                    &request.id,
                    &request.cmd,
                    ProcessOutcome::SpawnFailed(err.to_string()),
                );
            }
        }
    }
}

/// Cloneable sender side of the runtime actor.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    tx: mpsc::Sender<RuntimeEvent>,
}

impl RuntimeHandle {
    pub fn new(tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { tx }
    }

    /// Submit `cmd` and wait until the router has processed it.
    pub async fn submit(&self, cmd: impl Into<String>) -> Result<Submission> {
        let (reply, rx) = oneshot::channel();
        self.send(RuntimeEvent::RunRequested {
            cmd: cmd.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| PoolError::RuntimeStopped)
    }

    pub async fn status(&self) -> Result<Status> {
        let (reply, rx) = oneshot::channel();
        self.send(RuntimeEvent::StatusRequested { reply }).await?;
        rx.await.map_err(|_| PoolError::RuntimeStopped)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(RuntimeEvent::ShutdownRequested).await
    }

    async fn send(&self, event: RuntimeEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| PoolError::RuntimeStopped)
    }
}
