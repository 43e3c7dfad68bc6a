//! Player action DTOs (application layer)
//!
//! These types name the multi-step actions a player can take and the pieces
//! of input each one collects before it turns into a command.

use eclipse_shared::{Colour, Race};
use serde::{Deserialize, Serialize};

/// Kinds of action stage the client can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Pick race and colour before the game starts
    ChooseTeam,
    /// Rework ship blueprints
    Upgrade,
    /// Buy a technology tile
    Research,
    /// Reveal a new hex
    Explore,
    /// Move an influence disc from one hex to another
    Influence,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::ChooseTeam,
        ActionKind::Upgrade,
        ActionKind::Research,
        ActionKind::Explore,
        ActionKind::Influence,
    ];

    /// Name used by the server, both for the inbound command that activates the
    /// stage and for the `action` attribute of `start_action`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ChooseTeam => "choose_team",
            ActionKind::Upgrade => "upgrade",
            ActionKind::Research => "research",
            ActionKind::Explore => "explore",
            ActionKind::Influence => "influence",
        }
    }

    pub fn from_command(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of player-supplied input for the current stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum ActionInput {
    /// Race and colour pair from the team picker
    ChooseTeam { race: Race, colour: Colour },
    /// Technology tile id
    Technology { id: String },
    /// Map position index
    Position { index: u32 },
}

impl ActionInput {
    pub fn choose_team(race: Race, colour: Colour) -> Self {
        ActionInput::ChooseTeam { race, colour }
    }

    pub fn technology(id: &str) -> Self {
        ActionInput::Technology { id: id.to_string() }
    }

    pub fn position(index: u32) -> Self {
        ActionInput::Position { index }
    }
}
