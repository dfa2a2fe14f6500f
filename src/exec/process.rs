// src/exec/process.rs

//! Single child process runner.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ShellConfig;
use crate::engine::{LaunchRequest, RuntimeEvent};
use crate::types::ProcessOutcome;

/// Run `request.cmd` through `shell` and report its outcome to the runtime.
///
/// Stdout and stderr are drained so the child never blocks on a full pipe;
/// their lines are only logged at `debug`. A failure to spawn is reported as
/// [`ProcessOutcome::SpawnFailed`], a failure to wait as exit code `-1`.
pub async fn run_process(
    request: LaunchRequest,
    shell: ShellConfig,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    let outcome = run_process_inner(&request, &shell).await;

    let LaunchRequest { id, cmd } = request;
    if runtime_tx
        .send(RuntimeEvent::ProcessExited { id, cmd, outcome })
        .await
        .is_err()
    {
        warn!("runtime stopped before process exit could be reported");
    }
}

async fn run_process_inner(request: &LaunchRequest, shell: &ShellConfig) -> ProcessOutcome {
    let mut command = Command::new(&shell.program);
    command
        .args(&shell.args)
        .arg(&request.cmd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            error!(cmd = %request.cmd, error = %err, "failed to spawn process");
            return ProcessOutcome::SpawnFailed(err.to_string());
        }
    };

    info!(id = %request.id, cmd = %request.cmd, pid = ?child.id(), "process started");

    if let Some(stdout) = child.stdout.take() {
        drain_lines(stdout, request.cmd.clone(), "stdout");
    }
    if let Some(stderr) = child.stderr.take() {
        drain_lines(stderr, request.cmd.clone(), "stderr");
    }

    match child.wait().await {
        Ok(status) => {
            let code = status.code().unwrap_or(-1);
            info!(
                id = %request.id,
                cmd = %request.cmd,
                exit_code = code,
                success = status.success(),
                "process exited"
            );
            ProcessOutcome::Exited(code)
        }
        Err(err) => {
            error!(cmd = %request.cmd, error = %err, "waiting for process failed");
            ProcessOutcome::Exited(-1)
        }
    }
}

fn drain_lines<R>(reader: R, cmd: String, stream: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(cmd = %cmd, stream, "{}", line);
        }
    });
}
