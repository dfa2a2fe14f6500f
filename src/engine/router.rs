// src/engine/router.rs

//! Pure command router state machine.
//!
//! The router decides, for each run request, whether to start a process,
//! remember exactly one pending re-run, or drop the request, and turns
//! process exits into counter updates and queue advancement.
//!
//! It performs no IO and knows nothing about channels or processes: it
//! returns [`LaunchRequest`]s and the caller (the runtime actor) is
//! responsible for actually launching them. Events are dispatched on the
//! shared [`EventBus`] synchronously, before the method returns.
//!
//! Invariants kept here:
//! - an identity in `queued` is always also in `running`;
//! - at most one queued re-run exists per identity;
//! - an exit removes the running entry before anything else happens to that
//!   identity;
//! - `failed + succeeded` equals the number of exits observed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::engine::identity::CommandId;
use crate::events::{EventBus, ServerEvent};
use crate::status::Status;
use crate::types::ProcessOutcome;

/// A process the caller must start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub id: CommandId,
    pub cmd: String,
}

/// Result of [`CommandRouter::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing was running for this identity; the process must be launched.
    Started(LaunchRequest),
    /// The identity was running; one re-run is now queued.
    Queued,
    /// A re-run was already queued; the request was dropped.
    AlreadyQueued,
}

impl Submission {
    pub fn launch(&self) -> Option<&LaunchRequest> {
        match self {
            Submission::Started(req) => Some(req),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct CommandRouter {
    bus: Arc<EventBus>,
    started_at: Instant,
    running: HashMap<CommandId, String>,
    queued: HashMap<CommandId, String>,
    failed: u64,
    succeeded: u64,
}

impl CommandRouter {
    /// `started_at` is the uptime origin (when the socket became active).
    pub fn new(bus: Arc<EventBus>, started_at: Instant) -> Self {
        Self {
            bus,
            started_at,
            running: HashMap::new(),
            queued: HashMap::new(),
            failed: 0,
            succeeded: 0,
        }
    }

    /// Handle a run request for `cmd`.
    pub fn submit(&mut self, cmd: String) -> Submission {
        let id = CommandId::of(&cmd);

        if self.queued.contains_key(&id) {
            debug!(%id, cmd = %cmd, "re-run already queued; dropping request");
            self.bus.emit(ServerEvent::ProcessAlreadyQueued { cmd });
            return Submission::AlreadyQueued;
        }

        if self.running.contains_key(&id) {
            debug!(%id, cmd = %cmd, "command running; queueing one re-run");
            self.queued.insert(id, cmd.clone());
            self.bus.emit(ServerEvent::ProcessAlreadyRunning { cmd });
            return Submission::Queued;
        }

        self.running.insert(id.clone(), cmd.clone());
        self.bus.emit(ServerEvent::ProcessStarted { cmd: cmd.clone() });
        Submission::Started(LaunchRequest { id, cmd })
    }

    /// Handle the exit of the process launched for `id`.
    ///
    /// Returns the re-run to launch if one was queued for the same identity.
    pub fn handle_exit(
        &mut self,
        id: &CommandId,
        cmd: &str,
        outcome: ProcessOutcome,
    ) -> Option<LaunchRequest> {
        if self.running.remove(id).is_none() {
            warn!(%id, cmd = %cmd, "exit reported for a command that was not running");
        }

        if outcome.is_success() {
            self.succeeded += 1;
            self.bus.emit(ServerEvent::ProcessTerminated {
                cmd: cmd.to_string(),
                exit_code: 0,
            });
        } else {
            self.failed += 1;
            let message = match outcome {
                ProcessOutcome::Exited(code) => {
                    format!("command \"{cmd}\" failed with exit code {code}")
                }
                ProcessOutcome::SpawnFailed(reason) => {
                    format!("failed to start command \"{cmd}\": {reason}")
                }
            };
            self.bus.emit(ServerEvent::error(message));
        }

        let queued_cmd = self.queued.remove(id)?;
        debug!(%id, cmd = %queued_cmd, "promoting queued re-run");
        self.submit(queued_cmd).launch().cloned()
    }

    /// Point-in-time snapshot of the router state.
    pub fn status(&self) -> Status {
        Status {
            uptime: self.started_at.elapsed().as_secs_f64().round() as i64,
            running: count(self.running.len() as u64),
            queued: count(self.queued.len() as u64),
            failed: count(self.failed),
            succeeded: count(self.succeeded),
        }
    }

    pub fn is_running(&self, cmd: &str) -> bool {
        self.running.contains_key(&CommandId::of(cmd))
    }

    pub fn is_queued(&self, cmd: &str) -> bool {
        self.queued.contains_key(&CommandId::of(cmd))
    }

    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded
    }
}

fn count(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
