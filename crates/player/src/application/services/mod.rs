//! Application services
//!
//! Thin wrappers over the command bus that give the UI named operations.

pub mod action_service;
pub mod lobby_service;

pub use action_service::ActionService;
pub use lobby_service::LobbyService;
