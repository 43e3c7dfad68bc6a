//! The single current action stage.

use crate::application::actions::{ActionStage, Stage};
use crate::application::dto::ActionKind;
use crate::state::visibility::ActionView;

/// Holds at most one action stage.
///
/// Every exit goes through [`ActionSlot::exit`], so the outgoing stage is
/// cleaned up exactly once before anything else becomes current.
#[derive(Debug, Default)]
pub struct ActionSlot {
    current: Option<ActionStage>,
}

impl ActionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `stage` current. A stage already in progress is cancelled first.
    pub fn activate(&mut self, mut stage: ActionStage, view: &mut ActionView<'_>) {
        if let Some(previous) = self.exit(true, view) {
            tracing::debug!(previous = %previous, next = %stage.kind(), "Replacing action in progress");
        }
        stage.on_activate(view);
        self.current = Some(stage);
    }

    /// Finalize the current stage, if any, and return its kind.
    pub fn exit(&mut self, is_undo: bool, view: &mut ActionView<'_>) -> Option<ActionKind> {
        let mut stage = self.current.take()?;
        stage.clean_up(is_undo, view);
        view.hide_action_element();
        Some(stage.kind())
    }

    pub fn current(&self) -> Option<&ActionStage> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut ActionStage> {
        self.current.as_mut()
    }

    pub fn kind(&self) -> Option<ActionKind> {
        self.current.as_ref().map(|stage| stage.kind())
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::actions::{ExploreStage, UpgradeStage};
    use crate::ports::outbound::testing::RecordingUi;
    use crate::state::visibility::VisibilityCoordinator;

    #[test]
    fn test_activate_replaces_and_cleans_up_previous() {
        let ui = RecordingUi::new();
        let mut vis = VisibilityCoordinator::new();
        let mut view = ActionView::new(&mut vis, &ui);
        let mut slot = ActionSlot::new();

        slot.activate(ActionStage::Upgrade(UpgradeStage::new()), &mut view);
        slot.activate(ActionStage::Explore(ExploreStage::new(vec![1])), &mut view);

        assert_eq!(slot.kind(), Some(ActionKind::Explore));
        assert_eq!(ui.visible("choose_subaction"), Some(false));
        assert_eq!(ui.visible("choose_upgrade"), Some(false));
        assert_eq!(view.current_action_element(), Some("choose_explore_pos"));
    }

    #[test]
    fn test_exit_empties_slot_once() {
        let ui = RecordingUi::new();
        let mut vis = VisibilityCoordinator::new();
        let mut view = ActionView::new(&mut vis, &ui);
        let mut slot = ActionSlot::new();

        slot.activate(ActionStage::Upgrade(UpgradeStage::new()), &mut view);
        assert_eq!(slot.exit(false, &mut view), Some(ActionKind::Upgrade));
        assert_eq!(view.current_action_element(), None);

        ui.take();
        assert_eq!(slot.exit(true, &mut view), None);
        assert!(ui.calls().is_empty());
        assert!(!slot.is_active());
    }
}
