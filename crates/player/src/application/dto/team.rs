//! Payloads of the informational server commands.

use eclipse_shared::{Colour, Race, TeamId};
use serde::Deserialize;

/// One team as described by `update_team` / `update_teams`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamUpdate {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub race: Option<Race>,
    #[serde(default)]
    pub colour: Option<Colour>,
    /// Team still has to act this turn
    #[serde(default)]
    pub is_waiting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamList {
    pub teams: Vec<TeamUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WaitingUpdate {
    pub id: TeamId,
    pub is_waiting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamRef {
    pub id: TeamId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PanelRef {
    pub panel: String,
}

/// Payload of the `show_combat` / `show_score` toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Toggle {
    pub show: bool,
}

/// Optional choice lists that pre-populate an action stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StageOptions {
    #[serde(default)]
    pub races: Vec<String>,
    #[serde(default)]
    pub colours: Vec<String>,
    #[serde(default)]
    pub techs: Vec<String>,
    #[serde(default)]
    pub positions: Vec<u32>,
}
