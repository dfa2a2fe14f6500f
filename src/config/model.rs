// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Address used when neither the config file nor `--uri` names one.
pub const DEFAULT_URI: &str = "127.0.0.1:8085";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [server]
/// uri = "127.0.0.1:8085"
/// idle_timeout = "30s"
/// max_message_bytes = 65536
///
/// [exec]
/// shell = ["sh", "-c"]
///
/// [client]
/// timeout = "5s"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: RawServerSection,

    #[serde(default)]
    pub exec: RawExecSection,

    #[serde(default)]
    pub client: RawClientSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawServerSection {
    /// `host:port` to listen on.
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Close a connection after this long without inbound bytes.
    ///
    /// Absent means connections may idle forever.
    #[serde(default)]
    pub idle_timeout: Option<String>,

    /// Largest message (in bytes) buffered before the newline arrives.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

fn default_uri() -> String {
    DEFAULT_URI.to_string()
}

fn default_max_message_bytes() -> usize {
    64 * 1024
}

impl Default for RawServerSection {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            idle_timeout: None,
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

/// `[exec]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExecSection {
    /// Program and leading arguments; the command string is appended last.
    #[serde(default = "default_shell")]
    pub shell: Vec<String>,
}

fn default_shell() -> Vec<String> {
    if cfg!(windows) {
        vec!["cmd".to_string(), "/C".to_string()]
    } else {
        vec!["sh".to_string(), "-c".to_string()]
    }
}

impl Default for RawExecSection {
    fn default() -> Self {
        Self {
            shell: default_shell(),
        }
    }
}

/// `[client]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClientSection {
    /// I/O timeout for the `status` and `run` subcommands.
    #[serde(default = "default_client_timeout")]
    pub timeout: String,
}

fn default_client_timeout() -> String {
    "5s".to_string()
}

impl Default for RawClientSection {
    fn default() -> Self {
        Self {
            timeout: default_client_timeout(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or [`Default`]), so the
/// rest of the crate can rely on durations being parsed and the shell being
/// non-empty.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub server: ServerConfig,
    pub shell: ShellConfig,
    pub client: ClientConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        server: ServerConfig,
        shell: ShellConfig,
        client: ClientConfig,
    ) -> Self {
        Self {
            server,
            shell,
            client,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub uri: String,
    pub idle_timeout: Option<Duration>,
    pub max_message_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            idle_timeout: None,
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

impl ServerConfig {
    /// Same settings, listening on `uri` instead.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let mut shell = default_shell();
        let program = shell.remove(0);
        Self {
            program,
            args: shell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}
