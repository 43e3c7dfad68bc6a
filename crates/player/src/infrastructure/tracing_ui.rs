//! Headless `ClientUi` that logs every effect.

use eclipse_shared::TeamId;

use crate::ports::outbound::ClientUi;

/// Renders nothing; every UI effect becomes a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingUi;

impl TracingUi {
    pub fn new() -> Self {
        Self
    }
}

impl ClientUi for TracingUi {
    fn show_element(&self, id: &str, show: bool) {
        tracing::debug!(element = %id, show, "show");
    }

    fn set_enabled(&self, id: &str, enabled: bool) {
        tracing::debug!(element = %id, enabled, "enable");
    }

    fn set_options(&self, id: &str, options: &[String]) {
        tracing::info!(element = %id, ?options, "options");
    }

    fn highlight_positions(&self, positions: &[u32]) {
        tracing::info!(?positions, "highlight");
    }

    fn set_tab_label(&self, team: &TeamId, label: &str) {
        tracing::info!(team = %team, label = %label, "tab");
    }

    fn show_blanket(&self, show: bool) {
        tracing::debug!(show, "blanket");
    }

    fn show_session_ended(&self) {
        tracing::warn!("Session ended, restart the client to play again");
    }

    fn alert(&self, message: &str) {
        tracing::error!("{}", message);
    }
}
