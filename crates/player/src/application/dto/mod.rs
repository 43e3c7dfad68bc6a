//! Application DTOs: player actions and server command payloads.

pub mod player_action;
pub mod team;

pub use player_action::{ActionInput, ActionKind};
pub use team::{PanelRef, StageOptions, TeamList, TeamRef, TeamUpdate, Toggle, WaitingUpdate};
