use eclipse_shared::{CommandDocument, CommandType, EncodingError};

use super::{InputRejected, Stage};
use crate::application::dto::{ActionInput, ActionKind};
use crate::state::visibility::ActionView;

const ELEMENT: &str = "choose_upgrade";
const SUBACTION: &str = "choose_subaction";
const UNDO: &str = "choose_undo";
const UNDO_BUTTON: &str = "choose_undo_btn";

/// Blueprint upgrade. The board does the work; the stage only confirms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeStage;

impl UpgradeStage {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for UpgradeStage {
    fn kind(&self) -> ActionKind {
        ActionKind::Upgrade
    }

    fn on_activate(&mut self, view: &mut ActionView<'_>) {
        view.show_action_element(ELEMENT);
        view.show(SUBACTION, true);
        view.show(UNDO, true);
        view.set_enabled(UNDO_BUTTON, true);
    }

    fn on_input(
        &mut self,
        input: ActionInput,
        _view: &mut ActionView<'_>,
    ) -> Result<(), InputRejected> {
        Err(InputRejected::wrong_stage(self.kind(), &input))
    }

    fn try_send(&self) -> Result<Option<CommandDocument>, EncodingError> {
        Ok(Some(CommandDocument::new(CommandType::Upgrade)))
    }

    fn clean_up(&mut self, _is_undo: bool, view: &mut ActionView<'_>) {
        view.show(SUBACTION, false);
        view.show(UNDO, false);
        view.set_enabled(UNDO_BUTTON, false);
    }
}
