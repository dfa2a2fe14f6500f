// src/events/log.rs

//! `tracing`-backed observer used by the `listen` subcommand.

use tracing::{debug, error, info, trace};

use super::bus::Observer;
use super::event::ServerEvent;

/// Renders every [`ServerEvent`] as a log line.
///
/// Startup and errors are logged at `info`/`error`, per-process and
/// per-connection chatter at `debug`, and raw client bytes at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&self, event: &ServerEvent) {
        match event {
            ServerEvent::Listening { uri } => info!("Listening on {uri}"),
            ServerEvent::ClientConnected { address } => {
                debug!("Client \"{address}\" connected")
            }
            ServerEvent::ClientDisconnected { address } => {
                debug!("Client \"{address}\" disconnected")
            }
            ServerEvent::ClientDataReceived { data } => {
                trace!("Data received: \"{}\"", String::from_utf8_lossy(data))
            }
            ServerEvent::ProcessingMessage { kind } => {
                debug!("Processing message of type \"{kind}\"")
            }
            ServerEvent::ProcessStarted { cmd } => debug!("Starting process \"{cmd}\""),
            ServerEvent::ProcessTerminated { cmd, exit_code } => {
                debug!(exit_code, "Process \"{cmd}\" terminated")
            }
            ServerEvent::ProcessAlreadyRunning { cmd } => {
                debug!("Process \"{cmd}\" already running, queued")
            }
            ServerEvent::ProcessAlreadyQueued { cmd } => {
                debug!("Process \"{cmd}\" already queued, skipped")
            }
            ServerEvent::Error { message } => error!("{message}"),
        }
    }
}
