use eclipse_shared::{Colour, CommandDocument, CommandType, EncodingError, Race};

use super::{InputRejected, Stage};
use crate::application::dto::{ActionInput, ActionKind, StageOptions};
use crate::state::visibility::ActionView;

const ELEMENT: &str = "choose_team";
const SELECT_RACE: &str = "select_race";
const SELECT_COLOUR: &str = "select_colour";

/// Race and colour picker shown during the team choice phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooseTeamStage {
    races: Vec<Race>,
    colours: Vec<Colour>,
    selection: Option<(Race, Colour)>,
}

impl ChooseTeamStage {
    /// Offer everything.
    pub fn new() -> Self {
        Self::with_choices(Race::ALL.to_vec(), Colour::ALL.to_vec())
    }

    pub fn with_choices(races: Vec<Race>, colours: Vec<Colour>) -> Self {
        Self {
            races,
            colours,
            selection: None,
        }
    }

    /// Offer what the server listed; unknown names are skipped. An empty list,
    /// or one with no name this client knows, means "all".
    pub fn from_options(options: &StageOptions) -> Self {
        let races = parse_all(&options.races, Race::ALL.as_slice());
        let colours = parse_all(&options.colours, Colour::ALL.as_slice());
        Self::with_choices(races, colours)
    }

    pub fn selection(&self) -> Option<(Race, Colour)> {
        self.selection
    }
}

impl Default for ChooseTeamStage {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_all<T>(names: &[String], all: &[T]) -> Vec<T>
where
    T: std::str::FromStr + Copy,
    T::Err: std::fmt::Display,
{
    if names.is_empty() {
        return all.to_vec();
    }
    let known: Vec<T> = names
        .iter()
        .filter_map(|name| match name.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping offered choice");
                None
            }
        })
        .collect();
    if known.is_empty() {
        tracing::warn!(offered = ?names, "No offered choice is known, offering all");
        return all.to_vec();
    }
    known
}

impl Stage for ChooseTeamStage {
    fn kind(&self) -> ActionKind {
        ActionKind::ChooseTeam
    }

    fn on_activate(&mut self, view: &mut ActionView<'_>) {
        view.show_action_element(ELEMENT);

        let races: Vec<String> = self.races.iter().map(|r| r.to_string()).collect();
        let colours: Vec<String> = self.colours.iter().map(|c| c.to_string()).collect();
        view.set_options(SELECT_RACE, &races);
        view.set_options(SELECT_COLOUR, &colours);

        // A select control always has its first entry selected.
        if let (Some(&race), Some(&colour)) = (self.races.first(), self.colours.first()) {
            self.selection = Some((race, colour));
        }
    }

    fn on_input(
        &mut self,
        input: ActionInput,
        _view: &mut ActionView<'_>,
    ) -> Result<(), InputRejected> {
        let ActionInput::ChooseTeam { race, colour } = input else {
            return Err(InputRejected::wrong_stage(self.kind(), &input));
        };
        if !self.races.contains(&race) {
            return Err(InputRejected::NotOffered(race.to_string()));
        }
        if !self.colours.contains(&colour) {
            return Err(InputRejected::NotOffered(colour.to_string()));
        }
        self.selection = Some((race, colour));
        Ok(())
    }

    fn try_send(&self) -> Result<Option<CommandDocument>, EncodingError> {
        let Some((race, colour)) = self.selection else {
            return Ok(None);
        };
        CommandDocument::build(
            CommandType::ChooseTeam,
            [("race", race.as_str()), ("colour", colour.as_str())],
        )
        .map(Some)
    }
}
