// src/engine/mod.rs

//! Command dedup/queue engine.
//!
//! - [`identity`] turns a command string into its dedup key.
//! - [`router`] is the pure state machine: it owns the running set, the
//!   queued set and the outcome counters, and decides whether a request
//!   starts a process, queues one re-run, or is dropped.
//! - [`runtime`] is the async actor that owns the router, serialises every
//!   mutation through one channel, and hands launch requests to a
//!   [`crate::exec::ProcessLauncher`].

use tokio::sync::oneshot;

use crate::status::Status;
use crate::types::ProcessOutcome;

pub mod identity;
pub mod router;
pub mod runtime;

pub use identity::CommandId;
pub use router::{CommandRouter, LaunchRequest, Submission};
pub use runtime::{Runtime, RuntimeHandle};

/// Events flowing into the runtime actor from connection handlers and the
/// process launcher.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A client asked to run `cmd`.
    RunRequested {
        cmd: String,
        reply: oneshot::Sender<Submission>,
    },
    /// A client asked for a status snapshot.
    StatusRequested { reply: oneshot::Sender<Status> },
    /// A launched process ended.
    ProcessExited {
        id: CommandId,
        cmd: String,
        outcome: ProcessOutcome,
    },
    /// Stop the actor loop.
    ShutdownRequested,
}
