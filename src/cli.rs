// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `procpool`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procpool",
    version,
    about = "Run shell commands on request, never the same command twice at once.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Procpool.toml` in the current working directory, if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCPOOL_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// What to do; defaults to `listen`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the daemon.
    Listen {
        /// Address to listen on (host:port).
        #[arg(short, long, value_name = "URI")]
        uri: Option<String>,
    },
    /// Print the daemon's uptime and process counters.
    Status {
        /// Address of the daemon (host:port).
        #[arg(short, long, value_name = "URI")]
        uri: Option<String>,
    },
    /// Ask the daemon to run a command.
    Run {
        /// The shell command to run.
        cmd: String,

        /// Address of the daemon (host:port).
        #[arg(short, long, value_name = "URI")]
        uri: Option<String>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
