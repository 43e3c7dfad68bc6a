//! Command builder for lobby and turn-flow commands
//!
//! Action stages build their own commands; everything the player sends
//! outside a stage is constructed here.

use eclipse_shared::{CommandDocument, CommandType, EncodingError};

use crate::application::dto::ActionKind;

/// Builder for the commands that are not produced by an action stage.
///
/// # Usage
///
/// ```rust,ignore
/// let doc = CommandBuilder::join_game("g-42")?;
/// connection.send_command(doc, ui)?;
/// ```
pub struct CommandBuilder;

impl CommandBuilder {
    // =========================================================================
    // Session
    // =========================================================================

    /// Sent once, right after the socket opens.
    pub fn register(player: &str) -> Result<CommandDocument, EncodingError> {
        CommandDocument::build(CommandType::Register, [("player", player)])
    }

    // =========================================================================
    // Lobby
    // =========================================================================

    pub fn create_game() -> CommandDocument {
        CommandDocument::new(CommandType::CreateGame)
    }

    pub fn join_game(game: &str) -> Result<CommandDocument, EncodingError> {
        CommandDocument::build(CommandType::JoinGame, [("game", game)])
    }

    pub fn exit_game() -> CommandDocument {
        CommandDocument::new(CommandType::ExitGame)
    }

    pub fn start_game() -> CommandDocument {
        CommandDocument::new(CommandType::StartGame)
    }

    // =========================================================================
    // Turn flow
    // =========================================================================

    pub fn start_action(action: ActionKind) -> Result<CommandDocument, EncodingError> {
        CommandDocument::build(CommandType::StartAction, [("action", action.as_str())])
    }

    /// Undo the last committed step on the server.
    pub fn undo() -> CommandDocument {
        CommandDocument::new(CommandType::Undo)
    }

    pub fn commit() -> CommandDocument {
        CommandDocument::new(CommandType::Commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_carries_player_name() {
        let doc = CommandBuilder::register("Al ex").unwrap();
        assert_eq!(doc.to_xml(), r#"<command type="register" player="Al ex"/>"#);
    }

    #[test]
    fn test_join_game() {
        let doc = CommandBuilder::join_game("g-42").unwrap();
        assert_eq!(doc.kind(), "join_game");
        assert_eq!(doc.attr("game"), Some("g-42"));
    }

    #[test]
    fn test_start_action_uses_action_name() {
        let doc = CommandBuilder::start_action(ActionKind::Explore).unwrap();
        assert_eq!(
            doc.to_xml(),
            r#"<command type="start_action" action="explore"/>"#
        );
    }

    #[test]
    fn test_flow_commands_have_no_attributes() {
        for (doc, kind) in [
            (CommandBuilder::create_game(), "create_game"),
            (CommandBuilder::exit_game(), "exit_game"),
            (CommandBuilder::start_game(), "start_game"),
            (CommandBuilder::undo(), "undo"),
            (CommandBuilder::commit(), "commit"),
        ] {
            assert_eq!(doc.kind(), kind);
            assert_eq!(doc.attributes().count(), 0);
        }
    }
}
