//! WebSocket client for the game server
//!
//! - `core`: runtime-free connection state machine and busy indicator
//! - `desktop`: tokio-tungstenite socket and writer task
//! - `bridge`: the task that joins the session, the socket and the command bus
//! - `message_builder`: lobby and turn-flow command construction

mod bridge;
mod core;
mod desktop;
mod message_builder;
pub mod shared;

pub use bridge::{create_connection, Connection};
pub use self::core::{BusyIndicator, ConnectionManager};
pub use desktop::{ChannelSink, FrameStream, Inbound};
pub use message_builder::CommandBuilder;
