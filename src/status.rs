// src/status.rs

//! Status snapshot exchanged between the daemon and its clients.
//!
//! The daemon produces it with [`Status::to_json`]; clients parse it with
//! [`Status::from_json`], which is lenient: any field that is missing (or not
//! an integer) becomes [`Status::MISSING`] instead of failing, so replies from
//! an older or partially broken daemon still render.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{PoolError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Seconds since the listening socket became active.
    pub uptime: i64,
    pub running: i64,
    pub queued: i64,
    pub failed: i64,
    pub succeeded: i64,
}

impl Status {
    /// Placeholder for a field absent from a parsed payload.
    pub const MISSING: i64 = -1;

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let decoded: Value = serde_json::from_str(data.trim())?;
        let object = decoded.as_object().ok_or_else(|| {
            PoolError::Protocol(format!("expected status to be a JSON object, got {decoded}"))
        })?;

        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_i64)
                .unwrap_or(Self::MISSING)
        };

        Ok(Self {
            uptime: field("uptime"),
            running: field("running"),
            queued: field("queued"),
            failed: field("failed"),
            succeeded: field("succeeded"),
        })
    }
}
