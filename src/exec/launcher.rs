// src/exec/launcher.rs

//! Pluggable process launcher abstraction.
//!
//! The runtime talks to a `ProcessLauncher` instead of spawning processes
//! itself. A launcher starts the command and later reports exactly one
//! `RuntimeEvent::ProcessExited` for it, carrying the identity captured at
//! launch time.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::config::ShellConfig;
use crate::engine::{LaunchRequest, RuntimeEvent};
use crate::errors::Result;

use super::process::run_process;

/// Trait abstracting how commands are started.
///
/// Returning `Err` means nothing was started and no exit will be reported;
/// the runtime then records the launch as a spawn failure itself.
pub trait ProcessLauncher: Send {
    fn launch(
        &mut self,
        request: LaunchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production launcher: runs each command through the configured shell on
/// its own Tokio task.
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    shell: ShellConfig,
}

impl ShellLauncher {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, shell: ShellConfig) -> Self {
        Self { runtime_tx, shell }
    }
}

impl ProcessLauncher for ShellLauncher {
    fn launch(
        &mut self,
        request: LaunchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let runtime_tx = self.runtime_tx.clone();
        let shell = self.shell.clone();

        Box::pin(async move {
            tokio::spawn(run_process(request, shell, runtime_tx));
            Ok(())
        })
    }
}
