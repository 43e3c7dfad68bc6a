//! Lobby service: game list, joining, starting and the turn commit.

use anyhow::Result;

use crate::infrastructure::messaging::{CommandBus, LobbyRequest};

pub struct LobbyService {
    commands: CommandBus,
}

impl LobbyService {
    pub fn new(commands: CommandBus) -> Self {
        Self { commands }
    }

    pub fn create_game(&self) -> Result<()> {
        self.commands.lobby(LobbyRequest::CreateGame)
    }

    pub fn join_game(&self, game: &str) -> Result<()> {
        self.commands.lobby(LobbyRequest::JoinGame(game.to_string()))
    }

    pub fn exit_game(&self) -> Result<()> {
        self.commands.lobby(LobbyRequest::ExitGame)
    }

    pub fn start_game(&self) -> Result<()> {
        self.commands.lobby(LobbyRequest::StartGame)
    }

    /// End the turn.
    pub fn commit(&self) -> Result<()> {
        self.commands.lobby(LobbyRequest::Commit)
    }

    /// Take back the last committed step on the server.
    pub fn undo(&self) -> Result<()> {
        self.commands.lobby(LobbyRequest::Undo)
    }
}
