//! Eclipse player client core.
//!
//! Action stages collect player input and turn it into one command each; the
//! dispatcher maps server commands to stages and UI effects; the session owns
//! all mutable client state; the WebSocket bridge runs it against a server.

pub mod application;
pub mod config;
pub mod console;
pub mod error;
pub mod infrastructure;
pub mod ports;
pub mod state;

pub use config::ClientConfig;
pub use error::ClientError;
pub use infrastructure::websocket::{create_connection, Connection, ConnectionManager};
pub use state::SessionState;
