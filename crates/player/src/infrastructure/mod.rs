//! Infrastructure: messaging, the WebSocket transport and the headless UI.

pub mod messaging;
pub mod tracing_ui;
pub mod websocket;

// Re-export messaging types
pub use messaging::{CommandBus, ConnectionState};
pub use tracing_ui::TracingUi;
