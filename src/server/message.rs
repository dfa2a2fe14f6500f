// src/server/message.rs

//! Control message decoding and validation.
//!
//! Each step of the pipeline short-circuits with its own [`MessageError`]
//! variant; the error's `Display` text is what gets reported as the `ERROR`
//! event payload.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::MessageKind;

/// A validated control message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Status,
    Run { cmd: String },
}

impl ClientMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            ClientMessage::Status => MessageKind::Status,
            ClientMessage::Run { .. } => MessageKind::Run,
        }
    }

    /// Wire form: one JSON object terminated by `\n`.
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Failed to decode JSON data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Expected data to be an object, got {0}")]
    WrongShape(&'static str),

    #[error("Missing/invalid message \"type\"")]
    MissingType,

    #[error("Unsupported message type \"{0}\"")]
    UnsupportedType(String),

    #[error("Missing/invalid \"cmd\"")]
    MissingCmd,
}

impl MessageError {
    /// Whether the connection must be closed after reporting this error.
    ///
    /// Only a `run` message that failed its argument check closes: run
    /// requests always end the connection, whatever their outcome.
    pub fn closes_connection(&self) -> bool {
        matches!(self, MessageError::MissingCmd)
    }
}

/// Decode and validate one message.
pub fn parse_message(bytes: &[u8]) -> Result<ClientMessage, MessageError> {
    let decoded: Value = serde_json::from_slice(bytes)?;

    let object = match decoded {
        Value::Object(object) => object,
        other => return Err(MessageError::WrongShape(json_type_name(&other))),
    };

    let type_str = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MessageError::MissingType)?;

    let kind: MessageKind = type_str
        .parse()
        .map_err(|_| MessageError::UnsupportedType(type_str.to_string()))?;

    match kind {
        MessageKind::Status => Ok(ClientMessage::Status),
        MessageKind::Run => {
            let cmd = object
                .get("cmd")
                .and_then(Value::as_str)
                .ok_or(MessageError::MissingCmd)?;
            Ok(ClientMessage::Run {
                cmd: cmd.to_string(),
            })
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
