//! Command Bus and connection lifecycle messaging.
//!
//! - `CommandBus`: send UI events to the session running in the bridge task
//! - `ConnectionHandle`: manage connection lifecycle
//! - `ConnectionStateObserver`: read connection state and busy flag
//!
//! The WebSocket bridge (in the websocket module) connects these to the actual transport.

pub mod command_bus;
pub mod connection;

pub use command_bus::{BusMessage, CommandBus, LobbyRequest};
pub use connection::{ConnectionHandle, ConnectionState, ConnectionStateObserver, StatusCells};
