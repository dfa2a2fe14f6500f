// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod display;
pub mod engine;
pub mod errors;
pub mod events;
pub mod exec;
pub mod logging;
pub mod server;
pub mod status;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::{CliArgs, Command};
use crate::client::Client;
use crate::config::{load_or_default, validate_uri, ConfigFile};
use crate::display::status_table;
use crate::events::LogObserver;
use crate::server::Server;

/// High-level entry point used by `main.rs`.
///
/// Loads the config, then runs the chosen subcommand (`listen` when none is
/// given).
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref().map(Path::new))?;

    match args.command.unwrap_or(Command::Listen { uri: None }) {
        Command::Listen { uri } => listen(cfg, uri).await,
        Command::Status { uri } => {
            let client = Client::new(resolve_uri(&cfg, uri)?, cfg.client.timeout);
            let status = client.fetch_status().await?;
            print!("{}", status_table(&status));
            Ok(())
        }
        Command::Run { cmd, uri } => {
            let client = Client::new(resolve_uri(&cfg, uri)?, cfg.client.timeout);
            client.run(&cmd).await?;
            Ok(())
        }
    }
}

/// Run the daemon until Ctrl-C.
async fn listen(cfg: ConfigFile, uri: Option<String>) -> Result<()> {
    let uri = resolve_uri(&cfg, uri)?;
    let mut server = Server::new(cfg.server.with_uri(uri));
    server.on_all(LogObserver);

    let mut handle = server.bind(cfg.shell).await?;

    tokio::select! {
        res = handle.wait() => {
            res?;
            return Ok(());
        }
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                warn!(error = %err, "failed to listen for Ctrl+C; running until the runtime stops");
                handle.wait().await?;
                return Ok(());
            }
        }
    }

    info!("Ctrl+C received; shutting down");
    handle.shutdown().await?;
    Ok(())
}

/// `--uri` wins over `[server].uri`.
fn resolve_uri(cfg: &ConfigFile, uri: Option<String>) -> Result<String> {
    match uri {
        Some(uri) => {
            validate_uri(&uri)?;
            Ok(uri)
        }
        None => Ok(cfg.server.uri.clone()),
    }
}
