//! Command Bus for feeding UI events into the session.
//!
//! The bus is the only way the UI talks to the session once the connection
//! is running. The bridge task drains it and calls one session handler per
//! message, so every event runs to completion before the next one.

use anyhow::Result;
use tokio::sync::mpsc;

use crate::application::dto::{ActionInput, ActionKind};

/// Lobby and turn-flow requests that map straight to one outbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyRequest {
    CreateGame,
    JoinGame(String),
    ExitGame,
    StartGame,
    /// Ask the server to start an action; it answers with the activating command.
    StartAction(ActionKind),
    /// Undo the last committed step on the server.
    Undo,
    Commit,
}

/// Message types sent through the command bus to the bridge task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusMessage {
    /// One piece of input for the current action stage
    Input(ActionInput),
    /// Confirm the current action stage
    Confirm,
    /// Cancel the current action stage locally
    Cancel,
    Lobby(LobbyRequest),
}

/// Command bus for sending UI events to the session.
///
/// This is a concrete struct (not a trait) that can be cloned and shared.
/// Services depend on this directly rather than through a trait object.
#[derive(Clone)]
pub struct CommandBus {
    tx: mpsc::Sender<BusMessage>,
}

impl CommandBus {
    pub fn new(tx: mpsc::Sender<BusMessage>) -> Self {
        Self { tx }
    }

    /// Queue a message without waiting.
    pub fn send(&self, message: BusMessage) -> Result<()> {
        self.tx
            .try_send(message)
            .map_err(|e| anyhow::anyhow!("CommandBus send failed: {}", e))
    }

    pub fn input(&self, input: ActionInput) -> Result<()> {
        self.send(BusMessage::Input(input))
    }

    pub fn confirm(&self) -> Result<()> {
        self.send(BusMessage::Confirm)
    }

    pub fn cancel(&self) -> Result<()> {
        self.send(BusMessage::Cancel)
    }

    pub fn lobby(&self, request: LobbyRequest) -> Result<()> {
        self.send(BusMessage::Lobby(request))
    }
}
