//! Connection lifecycle management.
//!
//! This module provides types for managing the WebSocket connection lifecycle,
//! including connection state observation and disconnect control.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;

/// Connection state for the game session.
///
/// `Closed` is terminal: a closed session is never reopened, the player
/// restarts the client instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connect request yet
    Disconnected,
    /// Handshake in progress
    Connecting,
    /// Socket open and registered
    Open,
    /// Socket closed by error, by the server, or on request
    Closed,
}

impl ConnectionState {
    /// Convert to u8 for atomic storage.
    pub fn to_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Open => 2,
            ConnectionState::Closed => 3,
        }
    }

    /// Convert from u8 (atomic storage).
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Open,
            3 => ConnectionState::Closed,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Shared cells the bridge task publishes into after every event.
#[derive(Clone)]
pub struct StatusCells {
    state: Arc<AtomicU8>,
    busy: Arc<AtomicBool>,
}

impl StatusCells {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8())),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn publish(&self, state: ConnectionState, busy: bool) {
        self.state.store(state.to_u8(), Ordering::SeqCst);
        self.busy.store(busy, Ordering::SeqCst);
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl Default for StatusCells {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to manage connection lifecycle.
///
/// When this handle is dropped, it does NOT automatically disconnect.
/// Call `disconnect()` explicitly to close the connection.
pub struct ConnectionHandle {
    status: StatusCells,
    /// Channel to request disconnect (consumed on disconnect)
    disconnect_tx: Option<oneshot::Sender<()>>,
}

impl ConnectionHandle {
    /// Called by the bridge when spawning the connection task.
    pub fn new(status: StatusCells, disconnect_tx: oneshot::Sender<()>) -> Self {
        Self {
            status,
            disconnect_tx: Some(disconnect_tx),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.status.state()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Request disconnect.
    ///
    /// The connection may not close immediately - check `state()` to verify.
    /// Consumes the handle since a closed session cannot be reused.
    pub fn disconnect(mut self) {
        if let Some(tx) = self.disconnect_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Observable connection state and busy flag for UI binding.
///
/// Multiple observers can share the same underlying cells.
#[derive(Clone)]
pub struct ConnectionStateObserver {
    status: StatusCells,
}

impl ConnectionStateObserver {
    pub fn new(status: StatusCells) -> Self {
        Self { status }
    }

    pub fn state(&self) -> ConnectionState {
        self.status.state()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Whether a request is outstanding (the blanket is shown).
    pub fn is_busy(&self) -> bool {
        self.status.busy()
    }
}
