//! Line commands for the headless binary.

use eclipse_shared::{Colour, Race};

use crate::application::dto::ActionKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    CreateGame,
    JoinGame(String),
    ExitGame,
    StartGame,
    StartAction(ActionKind),
    ChooseTeam(Race, Colour),
    Technology(String),
    Position(u32),
    Confirm,
    /// Cancel the current action locally
    Cancel,
    /// Undo the last committed step on the server
    Undo,
    Commit,
    Quit,
    Empty,
}

pub const HELP: &str = "commands: create | join <game> | exit | start | action <kind> | \
race <race> <colour> | tech <id> | pos <n> | confirm | cancel | undo | commit | quit";

pub fn parse_line(line: &str) -> Result<ConsoleCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ConsoleCommand::Empty);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb, args.as_slice()) {
        ("create", []) => ConsoleCommand::CreateGame,
        ("join", [game]) => ConsoleCommand::JoinGame(game.to_string()),
        ("exit", []) => ConsoleCommand::ExitGame,
        ("start", []) => ConsoleCommand::StartGame,
        ("action", [kind]) => ConsoleCommand::StartAction(
            ActionKind::from_command(kind).ok_or_else(|| format!("unknown action {kind}"))?,
        ),
        ("race", [race, colour]) => ConsoleCommand::ChooseTeam(
            race.parse().map_err(|e| format!("{e}"))?,
            colour.parse().map_err(|e| format!("{e}"))?,
        ),
        ("tech", [id]) => ConsoleCommand::Technology(id.to_string()),
        ("pos", [n]) => {
            ConsoleCommand::Position(n.parse().map_err(|_| format!("not a position: {n}"))?)
        }
        ("confirm", []) => ConsoleCommand::Confirm,
        ("cancel", []) => ConsoleCommand::Cancel,
        ("undo", []) => ConsoleCommand::Undo,
        ("commit", []) => ConsoleCommand::Commit,
        ("quit", []) => ConsoleCommand::Quit,
        _ => return Err(HELP.to_string()),
    };
    Ok(command)
}
