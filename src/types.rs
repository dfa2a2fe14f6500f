// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a control message sent by a client.
///
/// - `Status`: ask the daemon for a [`crate::status::Status`] snapshot.
/// - `Run`: submit a command string for execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Status,
    Run,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Status => "status",
            MessageKind::Run => "run",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    /// Exact match only: the wire discriminator is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(MessageKind::Status),
            "run" => Ok(MessageKind::Run),
            other => Err(format!(
                "unsupported message type: {other} (expected \"status\" or \"run\")"
            )),
        }
    }
}

/// How a launched process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The process ran and exited. Signal-terminated processes report `-1`.
    Exited(i32),
    /// The process could not be started at all (e.g. shell not found).
    SpawnFailed(String),
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Exited(0))
    }
}
