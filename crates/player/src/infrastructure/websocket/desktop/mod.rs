//! Desktop WebSocket implementation using tokio-tungstenite

mod client;

pub use client::{open_socket, ChannelSink, FrameStream, Inbound};
