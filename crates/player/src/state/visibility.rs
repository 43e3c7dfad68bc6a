//! UI visibility coordination
//!
//! Exactly one "current action element" is visible at a time; showing a new
//! one hides the previous one. Top level panels follow the same rule.

use crate::ports::outbound::ClientUi;

/// Top level panels the server can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    GameList,
    Lobby,
    Choose,
    Game,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::GameList, Panel::Lobby, Panel::Choose, Panel::Game];

    pub fn element_id(&self) -> &'static str {
        match self {
            Panel::GameList => "game_list_panel",
            Panel::Lobby => "lobby_panel",
            Panel::Choose => "choose_panel",
            Panel::Game => "game_panel",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.element_id() == id)
    }
}

/// Tracks which elements are currently shown.
#[derive(Debug, Default)]
pub struct VisibilityCoordinator {
    current_action_element: Option<String>,
    current_panel: Option<Panel>,
}

impl VisibilityCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_action_element(&self) -> Option<&str> {
        self.current_action_element.as_deref()
    }

    pub fn current_panel(&self) -> Option<Panel> {
        self.current_panel
    }

    /// Hide the previous action element, then show `id` (or nothing).
    pub fn show_action_element(&mut self, ui: &dyn ClientUi, id: Option<&str>) {
        if let Some(prev) = self.current_action_element.take() {
            ui.show_element(&prev, false);
        }
        if let Some(id) = id {
            ui.show_element(id, true);
            self.current_action_element = Some(id.to_string());
        }
    }

    pub fn show_panel(&mut self, ui: &dyn ClientUi, panel: Panel) {
        for other in Panel::ALL {
            if other != panel {
                ui.show_element(other.element_id(), false);
            }
        }
        ui.show_element(panel.element_id(), true);
        self.current_panel = Some(panel);
    }

    pub fn show_team_page(&self, ui: &dyn ClientUi) {
        ui.show_element("team_page", true);
        ui.show_element("supply_page", false);
    }

    /// Combat view replaces the map while shown.
    pub fn show_combat(&self, ui: &dyn ClientUi, show: bool) {
        ui.show_element("combat", show);
        ui.show_element("map", !show);
        ui.show_element("map_ctrls", !show);
    }

    pub fn show_score(&self, ui: &dyn ClientUi, show: bool) {
        ui.show_element("game_panel_score", show);
        ui.show_element("game_panel_play", !show);
    }
}

/// What an action stage is allowed to touch while it runs.
pub struct ActionView<'a> {
    elements: &'a mut VisibilityCoordinator,
    ui: &'a dyn ClientUi,
}

impl<'a> ActionView<'a> {
    pub fn new(elements: &'a mut VisibilityCoordinator, ui: &'a dyn ClientUi) -> Self {
        Self { elements, ui }
    }

    /// Make `id` the one visible action element.
    pub fn show_action_element(&mut self, id: &str) {
        self.elements.show_action_element(self.ui, Some(id));
    }

    pub fn hide_action_element(&mut self) {
        self.elements.show_action_element(self.ui, None);
    }

    pub fn show(&self, id: &str, show: bool) {
        self.ui.show_element(id, show);
    }

    pub fn set_enabled(&self, id: &str, enabled: bool) {
        self.ui.set_enabled(id, enabled);
    }

    pub fn set_options(&self, id: &str, options: &[String]) {
        self.ui.set_options(id, options);
    }

    pub fn highlight(&self, positions: &[u32]) {
        self.ui.highlight_positions(positions);
    }

    pub fn current_action_element(&self) -> Option<&str> {
        self.elements.current_action_element()
    }
}
