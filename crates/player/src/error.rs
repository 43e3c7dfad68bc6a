//! Client error types

use eclipse_shared::EncodingError;
use thiserror::Error;

use crate::infrastructure::messaging::ConnectionState;

/// Errors surfaced by the client core and its transport.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The socket closed while the session was live. Not retried.
    #[error("Connection lost")]
    ConnectionLost,

    #[error("Not connected (state: {0:?})")]
    NotConnected(ConnectionState),

    /// A request is still awaiting its response; the blanket blocks input.
    #[error("Request {0} is still awaiting a response")]
    Busy(u64),

    #[error("Invalid connection transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ConnectionState,
        to: ConnectionState,
    },

    /// The runtime cannot provide something the client needs to run at all.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
