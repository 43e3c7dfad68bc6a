//! Outbound ports - Interfaces for external collaborators
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the session core to drive the UI and the socket without depending
//! on concrete implementations.

pub mod client_ui_port;
pub mod frame_sink_port;
pub mod testing;

pub use client_ui_port::ClientUi;
pub use frame_sink_port::FrameSink;

#[cfg(any(test, feature = "testing"))]
pub use client_ui_port::MockClientUi;
#[cfg(any(test, feature = "testing"))]
pub use frame_sink_port::MockFrameSink;
