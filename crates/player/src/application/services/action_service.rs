//! Action service for feeding player actions to the session
//!
//! This service wraps the command bus and provides convenient methods for
//! starting, filling in and confirming action stages.

use anyhow::Result;
use eclipse_shared::{Colour, Race};

use crate::application::dto::{ActionInput, ActionKind};
use crate::infrastructure::messaging::{CommandBus, LobbyRequest};

/// Service for driving action stages via the command bus
pub struct ActionService {
    commands: CommandBus,
}

impl ActionService {
    /// Create a new ActionService with the given command bus
    pub fn new(commands: CommandBus) -> Self {
        Self { commands }
    }

    /// Ask the server to start an action. The stage begins when the server
    /// answers with the activating command.
    pub fn start(&self, kind: ActionKind) -> Result<()> {
        self.commands.lobby(LobbyRequest::StartAction(kind))
    }

    pub fn choose_team(&self, race: Race, colour: Colour) -> Result<()> {
        self.commands.input(ActionInput::choose_team(race, colour))
    }

    pub fn choose_technology(&self, id: &str) -> Result<()> {
        self.commands.input(ActionInput::technology(id))
    }

    pub fn choose_position(&self, index: u32) -> Result<()> {
        self.commands.input(ActionInput::position(index))
    }

    pub fn confirm(&self) -> Result<()> {
        self.commands.confirm()
    }

    /// Cancel the current action locally. Nothing is sent.
    pub fn cancel(&self) -> Result<()> {
        self.commands.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::messaging::BusMessage;
    use tokio::sync::mpsc;

    fn create_test_command_bus() -> (CommandBus, mpsc::Receiver<BusMessage>) {
        let (tx, rx) = mpsc::channel(10);
        (CommandBus::new(tx), rx)
    }

    #[tokio::test]
    async fn choose_team_queues_input() {
        let (commands, mut rx) = create_test_command_bus();
        let svc = ActionService::new(commands);

        svc.choose_team(Race::Mechanema, Colour::White).unwrap();

        let msg = rx.recv().await.unwrap();
        assert_eq!(
            msg,
            BusMessage::Input(ActionInput::choose_team(Race::Mechanema, Colour::White))
        );
    }

    #[tokio::test]
    async fn start_goes_to_server_not_stage() {
        let (commands, mut rx) = create_test_command_bus();
        let svc = ActionService::new(commands);

        svc.start(ActionKind::Research).unwrap();

        let msg = rx.recv().await.unwrap();
        assert_eq!(
            msg,
            BusMessage::Lobby(LobbyRequest::StartAction(ActionKind::Research))
        );
    }
}
