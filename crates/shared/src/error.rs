//! Protocol error types

use thiserror::Error;

/// Failure while building an outbound command document.
///
/// These are programmer errors: a correct build never produces one at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("attribute '{name}' must be a string, got {found}")]
    NonStringAttribute { name: String, found: &'static str },

    #[error("invalid {what} name: '{name}'")]
    InvalidName { what: &'static str, name: String },

    #[error("attribute 'type' is reserved for the command discriminant")]
    ReservedAttribute,

    #[error("duplicate attribute '{0}'")]
    DuplicateAttribute(String),
}

/// Failure while reading a frame or document produced by the other side.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Inbound frame is not valid JSON.
    #[error("invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),

    /// Command document text is not a well-formed `<command>` element.
    #[error("malformed command document at byte {position}: {message}")]
    Xml { position: usize, message: String },

    /// A known server command carried parameters of the wrong shape.
    #[error("invalid parameters for '{command}': {source}")]
    Params {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// A closed-vocabulary value (race, colour, ...) was not recognised.
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

impl ProtocolError {
    pub(crate) fn xml(position: usize, message: impl Into<String>) -> Self {
        ProtocolError::Xml {
            position,
            message: message.into(),
        }
    }

    pub fn unknown_value(kind: &'static str, value: impl Into<String>) -> Self {
        ProtocolError::UnknownValue {
            kind,
            value: value.into(),
        }
    }
}
