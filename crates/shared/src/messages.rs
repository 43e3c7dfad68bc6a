//! Inbound frames (Server → Player)
//!
//! The server sends JSON objects. Exactly two shapes matter:
//! - `{"command": ...}` - a server-initiated command, routed to the dispatcher.
//!   `command` is either the command type as a string (sibling members become
//!   its parameters) or an object with a `type` member plus parameters.
//! - `{"response": ...}` - a generic acknowledgement of the last request.
//!
//! Anything else is ignored for forward compatibility.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ProtocolError;

/// Parsed inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerFrame {
    Command(ServerCommand),
    /// The value is carried for logging only; its presence is what matters.
    Response(Value),
    /// Valid JSON of a shape this client does not understand.
    Unrecognized,
}

/// A server-initiated command.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerCommand {
    kind: String,
    params: Map<String, Value>,
}

impl ServerCommand {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Map::new(),
        }
    }

    pub fn with_params(kind: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }

    /// Declared command type.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// Deserialize the parameters into a typed payload.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_value(Value::Object(self.params.clone())).map_err(|source| {
            ProtocolError::Params {
                command: self.kind.clone(),
                source,
            }
        })
    }
}

/// Parse one text frame.
///
/// Only invalid JSON is an error; an unexpected shape is `Unrecognized`.
pub fn parse_server_frame(text: &str) -> Result<ServerFrame, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut obj) = value else {
        return Ok(ServerFrame::Unrecognized);
    };

    // A falsy `command` (null, false, 0 or "") counts as absent.
    match obj.remove("command") {
        Some(Value::String(kind)) if !kind.is_empty() => {
            return Ok(ServerFrame::Command(ServerCommand::with_params(kind, obj)));
        }
        Some(Value::Object(mut inner)) => {
            return Ok(match inner.remove("type") {
                Some(Value::String(kind)) => {
                    ServerFrame::Command(ServerCommand::with_params(kind, inner))
                }
                _ => {
                    tracing::debug!("Command object without a string 'type'");
                    ServerFrame::Unrecognized
                }
            });
        }
        Some(Value::Null) | Some(Value::String(_)) | Some(Value::Bool(false)) | None => {}
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {}
        Some(_) => return Ok(ServerFrame::Unrecognized),
    }

    if let Some(response) = obj.remove("response") {
        return Ok(ServerFrame::Response(response));
    }

    Ok(ServerFrame::Unrecognized)
}
