use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use procpool::engine::{CommandId, LaunchRequest, RuntimeEvent};
use procpool::errors::{PoolError, Result};
use procpool::exec::ProcessLauncher;
use procpool::server::{Server, ServerHandle};
use procpool::types::ProcessOutcome;

/// Controller for fake processes.
///
/// Launches are only recorded; a "process" ends when the test calls
/// [`FakeProcesses::exit`], which reports the exit to the runtime exactly
/// like the real launcher would.
#[derive(Clone)]
pub struct FakeProcesses {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    launched: Arc<Mutex<Vec<LaunchRequest>>>,
}

impl FakeProcesses {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            runtime_tx,
            launched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Launcher that records into this controller.
    pub fn launcher(&self) -> FakeLauncher {
        FakeLauncher {
            launched: Arc::clone(&self.launched),
            reject: None,
        }
    }

    /// Launcher that refuses every launch with `reason`.
    pub fn rejecting_launcher(&self, reason: &str) -> FakeLauncher {
        FakeLauncher {
            launched: Arc::clone(&self.launched),
            reject: Some(reason.to_string()),
        }
    }

    pub fn launched(&self) -> Vec<LaunchRequest> {
        self.launched.lock().unwrap().clone()
    }

    pub fn launched_cmds(&self) -> Vec<String> {
        self.launched().into_iter().map(|r| r.cmd).collect()
    }

    /// Report that the process for `cmd` exited with `code`.
    pub async fn exit(&self, cmd: &str, code: i32) -> anyhow::Result<()> {
        self.report(cmd, ProcessOutcome::Exited(code)).await
    }

    pub async fn report(&self, cmd: &str, outcome: ProcessOutcome) -> anyhow::Result<()> {
        self.runtime_tx
            .send(RuntimeEvent::ProcessExited {
                id: CommandId::of(cmd),
                cmd: cmd.to_string(),
                outcome,
            })
            .await
            .map_err(anyhow::Error::from)
    }
}

/// A launcher that never spawns anything.
pub struct FakeLauncher {
    launched: Arc<Mutex<Vec<LaunchRequest>>>,
    reject: Option<String>,
}

impl ProcessLauncher for FakeLauncher {
    fn launch(
        &mut self,
        request: LaunchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let launched = Arc::clone(&self.launched);
        let reject = self.reject.clone();

        Box::pin(async move {
            if let Some(reason) = reject {
                return Err(PoolError::Other(anyhow::anyhow!(reason)));
            }
            launched.lock().unwrap().push(request);
            Ok(())
        })
    }
}

/// Bind `server` with a [`FakeLauncher`] and return the controller for it.
pub async fn bind_fake(server: Server) -> Result<(ServerHandle, FakeProcesses)> {
    let mut procs = None;
    let handle = server
        .bind_with(|tx| {
            let controller = FakeProcesses::new(tx);
            let launcher = controller.launcher();
            procs = Some(controller);
            launcher
        })
        .await?;
    let procs = procs.expect("bind_with always calls the launcher factory");
    Ok((handle, procs))
}
