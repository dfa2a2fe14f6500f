// src/engine/identity.rs

use std::fmt;

use blake3::Hasher;

/// Dedup key of a command: the blake3 digest of its exact bytes.
///
/// Any byte difference, whitespace included, yields a different identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(String);

impl CommandId {
    pub fn of(cmd: &str) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(cmd.as_bytes());
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short prefix is enough to tell commands apart in logs.
        f.write_str(&self.0[..12])
    }
}
