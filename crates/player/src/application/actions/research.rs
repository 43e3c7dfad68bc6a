use eclipse_shared::{CommandDocument, CommandType, EncodingError};

use super::{InputRejected, Stage};
use crate::application::dto::{ActionInput, ActionKind};
use crate::state::visibility::ActionView;

const ELEMENT: &str = "choose_research";
const SELECT_TECH: &str = "select_tech";

/// Buy one technology tile from the supply.
///
/// The server identifies the tile by its index in the offered list, so
/// `tech` goes out as that index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchStage {
    /// Tiles the server offered. Empty means no list was sent and the player
    /// names the index directly.
    available: Vec<String>,
    choice: Option<(usize, String)>,
}

impl ResearchStage {
    pub fn new(available: Vec<String>) -> Self {
        Self {
            available,
            choice: None,
        }
    }

    pub fn tech(&self) -> Option<&str> {
        self.choice.as_ref().map(|(_, name)| name.as_str())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        if self.available.is_empty() {
            return id.trim().parse().ok();
        }
        self.available.iter().position(|tile| tile == id)
    }
}

impl Stage for ResearchStage {
    fn kind(&self) -> ActionKind {
        ActionKind::Research
    }

    fn on_activate(&mut self, view: &mut ActionView<'_>) {
        view.show_action_element(ELEMENT);
        view.set_options(SELECT_TECH, &self.available);
    }

    fn on_input(
        &mut self,
        input: ActionInput,
        _view: &mut ActionView<'_>,
    ) -> Result<(), InputRejected> {
        let ActionInput::Technology { id } = input else {
            return Err(InputRejected::wrong_stage(self.kind(), &input));
        };
        let Some(index) = self.index_of(&id) else {
            return Err(InputRejected::NotOffered(id));
        };
        self.choice = Some((index, id));
        Ok(())
    }

    fn try_send(&self) -> Result<Option<CommandDocument>, EncodingError> {
        match &self.choice {
            Some((index, _)) => {
                CommandDocument::build(CommandType::Research, [("tech", index.to_string())])
                    .map(Some)
            }
            None => Ok(None),
        }
    }
}
