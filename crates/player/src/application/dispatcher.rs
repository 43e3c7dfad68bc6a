//! Action dispatcher
//!
//! Maps an inbound server command to what the session should do with it:
//! start an action stage, apply an informational effect, or nothing.

use eclipse_shared::{ProtocolError, ServerCommand, TeamId};

use crate::application::actions::{ActionStage, InfluenceStage};
use crate::application::dto::{
    ActionKind, PanelRef, StageOptions, TeamList, TeamRef, TeamUpdate, Toggle, WaitingUpdate,
};
use crate::state::visibility::Panel;

/// Informational commands, applied directly to session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowPanel(Panel),
    UpdateTeams(Vec<TeamUpdate>),
    UpdateTeam(TeamUpdate),
    SetWaiting { id: TeamId, is_waiting: bool },
    ShowTeam(TeamId),
    ShowCombat(bool),
    ShowScore(bool),
    CancelAction,
}

/// Outcome of dispatching one server command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Activate(ActionStage),
    Effect(Effect),
    Ignored,
}

/// Second half of an influence move. The first half arrives as `influence`.
const INFLUENCE_DST: &str = "influence_dst";

/// Closed table from command type to stage or effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn dispatch(&self, command: &ServerCommand) -> Dispatch {
        match self.try_dispatch(command) {
            Ok(dispatch) => dispatch,
            Err(e) => {
                tracing::warn!(command = %command.kind(), error = %e, "Ignoring malformed command");
                Dispatch::Ignored
            }
        }
    }

    fn try_dispatch(&self, command: &ServerCommand) -> Result<Dispatch, ProtocolError> {
        if let Some(kind) = ActionKind::from_command(command.kind()) {
            let options: StageOptions = command.params_as()?;
            return Ok(Dispatch::Activate(ActionStage::for_kind(kind, options)));
        }
        if command.kind() == INFLUENCE_DST {
            let StageOptions { positions, .. } = command.params_as()?;
            return Ok(Dispatch::Activate(ActionStage::Influence(
                InfluenceStage::destination(positions),
            )));
        }

        let effect = match command.kind() {
            "show" => {
                let PanelRef { panel } = command.params_as()?;
                match Panel::from_element_id(&panel) {
                    Some(panel) => Effect::ShowPanel(panel),
                    None => return Err(ProtocolError::unknown_value("panel", panel)),
                }
            }
            "update_teams" => {
                let TeamList { teams } = command.params_as()?;
                Effect::UpdateTeams(teams)
            }
            "update_team" => Effect::UpdateTeam(command.params_as()?),
            "update_passed" => {
                let WaitingUpdate { id, is_waiting } = command.params_as()?;
                Effect::SetWaiting { id, is_waiting }
            }
            "show_team" => {
                let TeamRef { id } = command.params_as()?;
                Effect::ShowTeam(id)
            }
            "show_combat" => {
                let Toggle { show } = command.params_as()?;
                Effect::ShowCombat(show)
            }
            "show_score" => {
                let Toggle { show } = command.params_as()?;
                Effect::ShowScore(show)
            }
            "cancel_action" => Effect::CancelAction,
            other => {
                tracing::debug!(command = %other, "Unknown command type");
                return Ok(Dispatch::Ignored);
            }
        };
        Ok(Dispatch::Effect(effect))
    }
}
