//! Eclipse Shared - wire vocabulary between the player client and the game server
//!
//! This crate contains everything both ends of the socket agree on:
//! - Outbound command documents (`CommandDocument`) and their XML codec
//! - Inbound JSON frames (`ServerFrame`, `ServerCommand`)
//! - Shared enums (races, colours) and value objects (team ids)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, thiserror and tracing
//! 2. **No runtime** - no tokio, no sockets; pure data types and codecs
//! 3. **Closed vocabularies** - command types, races and colours are enums

pub mod command;
pub mod error;
pub mod messages;
pub mod types;
pub mod xml;

pub use command::{CommandDocument, CommandType, TextElement};
pub use error::{EncodingError, ProtocolError};
pub use messages::{parse_server_frame, ServerCommand, ServerFrame};
pub use types::{Colour, Race, TeamId};
