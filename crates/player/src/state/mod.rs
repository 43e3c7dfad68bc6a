//! Session state containers
//!
//! The session owns everything mutable on the client side. Nothing here
//! touches the network directly; frames go out through the connection
//! manager's sink.

pub mod action_slot;
pub mod session_state;
pub mod team_registry;
pub mod visibility;

pub use action_slot::ActionSlot;
pub use session_state::{ConfirmOutcome, SessionState};
pub use team_registry::{Team, TeamRegistry};
pub use visibility::{ActionView, Panel, VisibilityCoordinator};
