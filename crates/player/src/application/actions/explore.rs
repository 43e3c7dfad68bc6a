use eclipse_shared::{CommandDocument, CommandType, EncodingError};

use super::{InputRejected, Stage};
use crate::application::dto::{ActionInput, ActionKind};
use crate::state::visibility::ActionView;

const ELEMENT: &str = "choose_explore_pos";

/// Pick the map position to explore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExploreStage {
    positions: Vec<u32>,
    pos: Option<u32>,
}

impl ExploreStage {
    pub fn new(positions: Vec<u32>) -> Self {
        Self {
            positions,
            pos: None,
        }
    }

    pub fn pos(&self) -> Option<u32> {
        self.pos
    }
}

impl Stage for ExploreStage {
    fn kind(&self) -> ActionKind {
        ActionKind::Explore
    }

    fn on_activate(&mut self, view: &mut ActionView<'_>) {
        view.show_action_element(ELEMENT);
        view.highlight(&self.positions);
    }

    fn on_input(
        &mut self,
        input: ActionInput,
        view: &mut ActionView<'_>,
    ) -> Result<(), InputRejected> {
        let ActionInput::Position { index } = input else {
            return Err(InputRejected::wrong_stage(self.kind(), &input));
        };
        if !self.positions.is_empty() && !self.positions.contains(&index) {
            return Err(InputRejected::NotOffered(index.to_string()));
        }
        self.pos = Some(index);
        view.highlight(&[index]);
        Ok(())
    }

    fn try_send(&self) -> Result<Option<CommandDocument>, EncodingError> {
        let Some(pos) = self.pos else {
            return Ok(None);
        };
        CommandDocument::build(CommandType::ExplorePos, [("pos", pos.to_string())]).map(Some)
    }

    fn clean_up(&mut self, _is_undo: bool, view: &mut ActionView<'_>) {
        view.highlight(&[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::testing::{RecordingUi, UiCall};
    use crate::state::visibility::VisibilityCoordinator;

    #[test]
    fn test_highlights_candidates_then_choice() {
        let ui = RecordingUi::new();
        let mut vis = VisibilityCoordinator::new();
        let mut view = ActionView::new(&mut vis, &ui);
        let mut stage = ExploreStage::new(vec![3, 7]);

        stage.on_activate(&mut view);
        stage.on_input(ActionInput::position(7), &mut view).unwrap();
        stage.clean_up(false, &mut view);

        let highlights: Vec<_> = ui
            .calls()
            .into_iter()
            .filter(|c| matches!(c, UiCall::Highlight(_)))
            .collect();
        assert_eq!(
            highlights,
            vec![
                UiCall::Highlight(vec![3, 7]),
                UiCall::Highlight(vec![7]),
                UiCall::Highlight(vec![]),
            ]
        );
    }

    #[test]
    fn test_rejects_position_not_offered() {
        let ui = RecordingUi::new();
        let mut vis = VisibilityCoordinator::new();
        let mut view = ActionView::new(&mut vis, &ui);
        let mut stage = ExploreStage::new(vec![3]);

        let err = stage.on_input(ActionInput::position(4), &mut view).unwrap_err();
        assert_eq!(err, InputRejected::NotOffered("4".into()));
        assert_eq!(stage.try_send().unwrap(), None);
    }

    #[test]
    fn test_try_send_carries_pos() {
        let ui = RecordingUi::new();
        let mut vis = VisibilityCoordinator::new();
        let mut view = ActionView::new(&mut vis, &ui);
        let mut stage = ExploreStage::new(Vec::new());

        stage.on_input(ActionInput::position(12), &mut view).unwrap();
        let doc = stage.try_send().unwrap().unwrap();
        assert_eq!(doc.kind(), "cmd_explore_pos");
        assert_eq!(doc.attr("pos"), Some("12"));
    }
}
