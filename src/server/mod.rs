// src/server/mod.rs

//! TCP control channel.
//!
//! - [`listener`] binds the socket, starts the runtime actor and accepts
//!   connections.
//! - [`connection`] frames inbound bytes and routes validated messages.
//! - [`message`] is the validation pipeline for a single message.

pub mod connection;
pub mod listener;
pub mod message;

pub use connection::{handle_connection, ConnectionContext, Flow, LineFramer};
pub use listener::{Server, ServerHandle};
pub use message::{parse_message, ClientMessage, MessageError};
