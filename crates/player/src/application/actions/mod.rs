//! Action stages
//!
//! An action stage is one in-progress player action. It is activated by a
//! server command, collects input over several UI events, and on confirmation
//! turns into exactly one outbound command.
//!
//! The set of stages is closed: every variant lives in `ActionStage` and
//! implements [`Stage`]. Adding an action means adding a variant.

mod choose_team;
mod explore;
mod influence;
mod research;
mod upgrade;

pub use choose_team::ChooseTeamStage;
pub use explore::ExploreStage;
pub use influence::InfluenceStage;
pub use research::ResearchStage;
pub use upgrade::UpgradeStage;

use eclipse_shared::{CommandDocument, EncodingError};
use thiserror::Error;

use crate::application::dto::{ActionInput, ActionKind, StageOptions};
use crate::state::visibility::ActionView;

/// Why a piece of input was not accepted. The stage is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputRejected {
    #[error("No action in progress")]
    NoActiveAction,

    #[error("{stage} does not take {input} input")]
    WrongStage {
        stage: ActionKind,
        input: &'static str,
    },

    #[error("{0} is not one of the offered choices")]
    NotOffered(String),
}

impl InputRejected {
    pub(crate) fn wrong_stage(stage: ActionKind, input: &ActionInput) -> Self {
        let input = match input {
            ActionInput::ChooseTeam { .. } => "team",
            ActionInput::Technology { .. } => "technology",
            ActionInput::Position { .. } => "position",
        };
        InputRejected::WrongStage { stage, input }
    }
}

/// Lifecycle every action stage implements.
pub trait Stage {
    fn kind(&self) -> ActionKind;

    /// Called once when the stage becomes current. Reveals its input elements.
    fn on_activate(&mut self, view: &mut ActionView<'_>);

    /// Validate and store one piece of input. Never touches the network.
    fn on_input(
        &mut self,
        input: ActionInput,
        view: &mut ActionView<'_>,
    ) -> Result<(), InputRejected>;

    /// Build the outbound command, or `None` while required input is missing.
    fn try_send(&self) -> Result<Option<CommandDocument>, EncodingError>;

    /// Called exactly once when the stage stops being current.
    ///
    /// `is_undo` is true only when the player cancelled.
    fn clean_up(&mut self, _is_undo: bool, _view: &mut ActionView<'_>) {}
}

/// The closed set of action stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStage {
    ChooseTeam(ChooseTeamStage),
    Upgrade(UpgradeStage),
    Research(ResearchStage),
    Explore(ExploreStage),
    Influence(InfluenceStage),
}

impl ActionStage {
    /// Construct the stage for `kind`, seeded with whatever choices the server offered.
    pub fn for_kind(kind: ActionKind, options: StageOptions) -> Self {
        match kind {
            ActionKind::ChooseTeam => {
                ActionStage::ChooseTeam(ChooseTeamStage::from_options(&options))
            }
            ActionKind::Upgrade => ActionStage::Upgrade(UpgradeStage::new()),
            ActionKind::Research => ActionStage::Research(ResearchStage::new(options.techs)),
            ActionKind::Explore => ActionStage::Explore(ExploreStage::new(options.positions)),
            ActionKind::Influence => {
                ActionStage::Influence(InfluenceStage::source(options.positions))
            }
        }
    }

    fn as_stage(&self) -> &dyn Stage {
        match self {
            ActionStage::ChooseTeam(s) => s,
            ActionStage::Upgrade(s) => s,
            ActionStage::Research(s) => s,
            ActionStage::Explore(s) => s,
            ActionStage::Influence(s) => s,
        }
    }

    fn as_stage_mut(&mut self) -> &mut dyn Stage {
        match self {
            ActionStage::ChooseTeam(s) => s,
            ActionStage::Upgrade(s) => s,
            ActionStage::Research(s) => s,
            ActionStage::Explore(s) => s,
            ActionStage::Influence(s) => s,
        }
    }
}

impl Stage for ActionStage {
    fn kind(&self) -> ActionKind {
        self.as_stage().kind()
    }

    fn on_activate(&mut self, view: &mut ActionView<'_>) {
        self.as_stage_mut().on_activate(view)
    }

    fn on_input(
        &mut self,
        input: ActionInput,
        view: &mut ActionView<'_>,
    ) -> Result<(), InputRejected> {
        self.as_stage_mut().on_input(input, view)
    }

    fn try_send(&self) -> Result<Option<CommandDocument>, EncodingError> {
        self.as_stage().try_send()
    }

    fn clean_up(&mut self, is_undo: bool, view: &mut ActionView<'_>) {
        self.as_stage_mut().clean_up(is_undo, view)
    }
}
