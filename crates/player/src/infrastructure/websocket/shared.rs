//! Shared constants for the connection core and the desktop transport.

/// Keep-alive period when nothing else is configured.
pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;

/// Endpoint used when no URL is configured.
pub const DEFAULT_WS_URL: &str = "ws://localhost:8998";

/// Keep-alive frame. The server ignores empty frames.
pub const HEARTBEAT_FRAME: &str = "";

/// Depth of the UI event channel feeding the bridge task.
pub const COMMAND_CHANNEL_CAPACITY: usize = 32;
