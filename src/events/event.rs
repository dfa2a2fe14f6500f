// src/events/event.rs

use std::fmt;

use crate::types::MessageKind;

/// Discriminator used to register observers on the [`super::EventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Listening,
    ClientConnected,
    ClientDisconnected,
    ClientDataReceived,
    ProcessingMessage,
    ProcessStarted,
    ProcessTerminated,
    ProcessAlreadyRunning,
    ProcessAlreadyQueued,
    Error,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::Listening,
        EventKind::ClientConnected,
        EventKind::ClientDisconnected,
        EventKind::ClientDataReceived,
        EventKind::ProcessingMessage,
        EventKind::ProcessStarted,
        EventKind::ProcessTerminated,
        EventKind::ProcessAlreadyRunning,
        EventKind::ProcessAlreadyQueued,
        EventKind::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Listening => "LISTENING",
            EventKind::ClientConnected => "CLIENT_CONNECTED",
            EventKind::ClientDisconnected => "CLIENT_DISCONNECTED",
            EventKind::ClientDataReceived => "CLIENT_DATA_RECEIVED",
            EventKind::ProcessingMessage => "PROCESSING_MESSAGE",
            EventKind::ProcessStarted => "PROCESS_STARTED",
            EventKind::ProcessTerminated => "PROCESS_TERMINATED",
            EventKind::ProcessAlreadyRunning => "PROCESS_ALREADY_RUNNING",
            EventKind::ProcessAlreadyQueued => "PROCESS_ALREADY_QUEUED",
            EventKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event raised by the server, router or a connection handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The listening socket is active on `uri`.
    Listening { uri: String },
    ClientConnected { address: String },
    ClientDisconnected { address: String },
    /// Raw bytes of one read from a client connection.
    ClientDataReceived { data: Vec<u8> },
    /// A message passed validation and is about to be routed.
    ProcessingMessage { kind: MessageKind },
    ProcessStarted { cmd: String },
    ProcessTerminated { cmd: String, exit_code: i32 },
    /// `cmd` was running; one re-run is now queued.
    ProcessAlreadyRunning { cmd: String },
    /// `cmd` already had a queued re-run; the request was dropped.
    ProcessAlreadyQueued { cmd: String },
    Error { message: String },
}

impl ServerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ServerEvent::Listening { .. } => EventKind::Listening,
            ServerEvent::ClientConnected { .. } => EventKind::ClientConnected,
            ServerEvent::ClientDisconnected { .. } => EventKind::ClientDisconnected,
            ServerEvent::ClientDataReceived { .. } => EventKind::ClientDataReceived,
            ServerEvent::ProcessingMessage { .. } => EventKind::ProcessingMessage,
            ServerEvent::ProcessStarted { .. } => EventKind::ProcessStarted,
            ServerEvent::ProcessTerminated { .. } => EventKind::ProcessTerminated,
            ServerEvent::ProcessAlreadyRunning { .. } => EventKind::ProcessAlreadyRunning,
            ServerEvent::ProcessAlreadyQueued { .. } => EventKind::ProcessAlreadyQueued,
            ServerEvent::Error { .. } => EventKind::Error,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}
