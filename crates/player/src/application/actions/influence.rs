use eclipse_shared::{CommandDocument, CommandType, EncodingError};

use super::{InputRejected, Stage};
use crate::application::dto::{ActionInput, ActionKind};
use crate::state::visibility::ActionView;

/// Which half of an influence move the server asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfluenceStep {
    Source,
    Destination,
}

impl InfluenceStep {
    fn element(self) -> &'static str {
        match self {
            InfluenceStep::Source => "choose_influence_src",
            InfluenceStep::Destination => "choose_influence_dst",
        }
    }

    fn command(self) -> CommandType {
        match self {
            InfluenceStep::Source => CommandType::InfluenceSrc,
            InfluenceStep::Destination => CommandType::InfluenceDst,
        }
    }
}

/// One half of moving an influence disc.
///
/// The server runs the move as two round trips: it asks for the source, then
/// for the destination. Each step is its own stage and sends one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluenceStage {
    step: InfluenceStep,
    positions: Vec<u32>,
    pos: Option<u32>,
}

impl InfluenceStage {
    pub fn source(positions: Vec<u32>) -> Self {
        Self::new(InfluenceStep::Source, positions)
    }

    pub fn destination(positions: Vec<u32>) -> Self {
        Self::new(InfluenceStep::Destination, positions)
    }

    fn new(step: InfluenceStep, positions: Vec<u32>) -> Self {
        Self {
            step,
            positions,
            pos: None,
        }
    }

    pub fn pos(&self) -> Option<u32> {
        self.pos
    }
}

impl Stage for InfluenceStage {
    fn kind(&self) -> ActionKind {
        ActionKind::Influence
    }

    fn on_activate(&mut self, view: &mut ActionView<'_>) {
        view.show_action_element(self.step.element());
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
        CommandDocument::build(self.step.command(), [("pos", pos.to_string())]).map(Some)
    }

    fn clean_up(&mut self, _is_undo: bool, view: &mut ActionView<'_>) {
        view.highlight(&[]);
    }
}
