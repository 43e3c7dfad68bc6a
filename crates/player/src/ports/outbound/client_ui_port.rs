//! Client UI Port - the rendering collaborator
//!
//! Element ids are the ones the page markup uses (`choose_team`, `blanket`,
//! `team_tab_<id>` ...). The core never renders anything itself.

use eclipse_shared::TeamId;

/// Port for the visible side of the client.
///
/// Methods take `&self`; implementations that record or batch use interior
/// mutability.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ClientUi: Send {
    /// Show or hide one element by id.
    fn show_element(&self, id: &str, show: bool);

    /// Enable or disable one control by id.
    fn set_enabled(&self, id: &str, enabled: bool);

    /// Replace the entries of a select control.
    fn set_options(&self, id: &str, options: &[String]);

    /// Highlight map positions; an empty slice clears the highlight.
    fn highlight_positions(&self, positions: &[u32]);

    /// Set the label of a team's tab.
    fn set_tab_label(&self, team: &TeamId, label: &str);

    /// Show or hide the busy blanket that blocks input while a request is pending.
    fn show_blanket(&self, show: bool);

    /// Show the blocking overlay telling the player the session has ended.
    fn show_session_ended(&self);

    /// User-visible alert.
    fn alert(&self, message: &str);
}
