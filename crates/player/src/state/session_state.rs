//! Session state
//!
//! Everything the client knows about one session: the current action stage,
//! the teams, what is visible and the connection. Each handler runs to
//! completion; the bridge task calls them one event at a time.

use std::time::Instant;

use eclipse_shared::ServerCommand;

use crate::application::actions::{ActionStage, InputRejected, Stage};
use crate::application::dispatcher::{ActionDispatcher, Dispatch, Effect};
use crate::application::dto::{ActionInput, ActionKind, StageOptions};
use crate::error::ClientError;
use crate::infrastructure::messaging::{BusMessage, ConnectionState, LobbyRequest};
use crate::infrastructure::websocket::{CommandBuilder, ConnectionManager};
use crate::ports::outbound::{ClientUi, FrameSink};
use crate::state::action_slot::ActionSlot;
use crate::state::team_registry::TeamRegistry;
use crate::state::visibility::{ActionView, VisibilityCoordinator};

/// What happened to a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The command went out; busy carries this generation.
    Sent { generation: u64 },
    /// Required input is missing. The stage stays current.
    Incomplete,
    /// No action in progress.
    Idle,
}

pub struct SessionState {
    ui: Box<dyn ClientUi>,
    slot: ActionSlot,
    visibility: VisibilityCoordinator,
    teams: TeamRegistry,
    connection: ConnectionManager,
    dispatcher: ActionDispatcher,
}

impl SessionState {
    pub fn new(ui: Box<dyn ClientUi>, connection: ConnectionManager) -> Self {
        Self {
            ui,
            slot: ActionSlot::new(),
            visibility: VisibilityCoordinator::new(),
            teams: TeamRegistry::new(),
            connection,
            dispatcher: ActionDispatcher::new(),
        }
    }

    // =========================================================================
    // Connection events
    // =========================================================================

    pub fn connect(&mut self, url: &str) -> Result<(), ClientError> {
        self.connection.connect(url)
    }

    pub fn on_open(&mut self, sink: Box<dyn FrameSink>) -> Result<(), ClientError> {
        self.connection.on_open(sink)
    }

    /// The socket is gone. Any action in progress is cancelled.
    pub fn on_close(&mut self) {
        if self.connection.on_close(self.ui.as_ref()) {
            self.cancel();
        }
    }

    pub fn on_frame(&mut self, text: &str) {
        if let Some(command) = self.connection.on_frame(text, self.ui.as_ref()) {
            self.dispatch(&command);
        }
    }

    pub fn on_heartbeat_tick(&mut self) -> bool {
        self.connection.on_heartbeat_tick()
    }

    pub fn on_request_timeout(&mut self, generation: u64) -> bool {
        self.connection.on_request_timeout(generation, self.ui.as_ref())
    }

    pub fn request_deadline(&self) -> Option<(u64, Instant)> {
        self.connection.request_deadline()
    }

    // =========================================================================
    // Server commands
    // =========================================================================

    pub fn dispatch(&mut self, command: &ServerCommand) {
        match self.dispatcher.dispatch(command) {
            Dispatch::Activate(stage) => self.install(stage),
            Dispatch::Effect(effect) => self.apply(effect),
            Dispatch::Ignored => {}
        }
    }

    fn apply(&mut self, effect: Effect) {
        let ui = self.ui.as_ref();
        match effect {
            Effect::ShowPanel(panel) => self.visibility.show_panel(ui, panel),
            Effect::UpdateTeams(teams) => self.teams.replace_all(teams, ui),
            Effect::UpdateTeam(team) => self.teams.upsert(team, ui),
            Effect::SetWaiting { id, is_waiting } => {
                self.teams.set_waiting(&id, is_waiting, ui);
            }
            Effect::ShowTeam(id) => {
                if self.teams.set_current(id) {
                    self.visibility.show_team_page(ui);
                }
            }
            Effect::ShowCombat(show) => self.visibility.show_combat(ui, show),
            Effect::ShowScore(show) => self.visibility.show_score(ui, show),
            Effect::CancelAction => {
                self.cancel();
            }
        }
    }

    // =========================================================================
    // Action stages
    // =========================================================================

    /// Start `kind` locally with no server-supplied choices.
    pub fn activate(&mut self, kind: ActionKind) {
        self.install(ActionStage::for_kind(kind, StageOptions::default()));
    }

    fn install(&mut self, stage: ActionStage) {
        tracing::info!(action = %stage.kind(), "Action started");
        let mut view = ActionView::new(&mut self.visibility, self.ui.as_ref());
        self.slot.activate(stage, &mut view);
    }

    pub fn input(&mut self, input: ActionInput) -> Result<(), InputRejected> {
        let stage = self.slot.current_mut().ok_or(InputRejected::NoActiveAction)?;
        let mut view = ActionView::new(&mut self.visibility, self.ui.as_ref());
        stage.on_input(input, &mut view)
    }

    /// Turn the current stage into its command and send it.
    pub fn confirm(&mut self) -> Result<ConfirmOutcome, ClientError> {
        let Some(stage) = self.slot.current() else {
            return Ok(ConfirmOutcome::Idle);
        };
        if self.connection.state() != ConnectionState::Open {
            return Err(ClientError::NotConnected(self.connection.state()));
        }
        let Some(doc) = stage.try_send()? else {
            tracing::debug!(action = %stage.kind(), "Confirm with missing input");
            return Ok(ConfirmOutcome::Incomplete);
        };

        // The stage stays current unless the command actually went out.
        let generation = self.connection.send_command(doc, self.ui.as_ref())?;
        let mut view = ActionView::new(&mut self.visibility, self.ui.as_ref());
        self.slot.exit(false, &mut view);
        Ok(ConfirmOutcome::Sent { generation })
    }

    /// Cancel the current stage locally. Nothing is sent.
    pub fn cancel(&mut self) -> Option<ActionKind> {
        let mut view = ActionView::new(&mut self.visibility, self.ui.as_ref());
        let cancelled = self.slot.exit(true, &mut view);
        if let Some(kind) = cancelled {
            tracing::info!(action = %kind, "Action cancelled");
        }
        cancelled
    }

    // =========================================================================
    // Lobby and turn flow
    // =========================================================================

    pub fn lobby(&mut self, request: LobbyRequest) -> Result<u64, ClientError> {
        let doc = match request {
            LobbyRequest::CreateGame => CommandBuilder::create_game(),
            LobbyRequest::JoinGame(game) => CommandBuilder::join_game(&game)?,
            LobbyRequest::ExitGame => CommandBuilder::exit_game(),
            LobbyRequest::StartGame => CommandBuilder::start_game(),
            LobbyRequest::StartAction(kind) => CommandBuilder::start_action(kind)?,
            LobbyRequest::Undo => CommandBuilder::undo(),
            LobbyRequest::Commit => CommandBuilder::commit(),
        };
        self.connection.send_command(doc, self.ui.as_ref())
    }

    pub fn create_game(&mut self) -> Result<u64, ClientError> {
        self.lobby(LobbyRequest::CreateGame)
    }

    pub fn join_game(&mut self, game: &str) -> Result<u64, ClientError> {
        self.lobby(LobbyRequest::JoinGame(game.to_string()))
    }

    pub fn start_game(&mut self) -> Result<u64, ClientError> {
        self.lobby(LobbyRequest::StartGame)
    }

    pub fn exit_game(&mut self) -> Result<u64, ClientError> {
        self.lobby(LobbyRequest::ExitGame)
    }

    pub fn start_action(&mut self, kind: ActionKind) -> Result<u64, ClientError> {
        self.lobby(LobbyRequest::StartAction(kind))
    }

    pub fn commit(&mut self) -> Result<u64, ClientError> {
        self.lobby(LobbyRequest::Commit)
    }

    /// Undo the last committed step on the server. Unlike [`Self::cancel`]
    /// this is a normal request.
    pub fn undo_on_server(&mut self) -> Result<u64, ClientError> {
        self.lobby(LobbyRequest::Undo)
    }

    // =========================================================================
    // Bus
    // =========================================================================

    /// Run one UI event. Failures are logged; the session stays usable.
    pub fn handle(&mut self, message: BusMessage) {
        match message {
            BusMessage::Input(input) => {
                if let Err(e) = self.input(input) {
                    tracing::info!(error = %e, "Input rejected");
                }
            }
            BusMessage::Confirm => match self.confirm() {
                Ok(outcome) => tracing::debug!(?outcome, "Confirm handled"),
                Err(e) => log_send_error(&e),
            },
            BusMessage::Cancel => {
                self.cancel();
            }
            BusMessage::Lobby(request) => {
                if let Err(e) = self.lobby(request) {
                    log_send_error(&e);
                }
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn current_action(&self) -> Option<ActionKind> {
        self.slot.kind()
    }

    pub fn current_stage(&self) -> Option<&ActionStage> {
        self.slot.current()
    }

    pub fn teams(&self) -> &TeamRegistry {
        &self.teams
    }

    pub fn visibility(&self) -> &VisibilityCoordinator {
        &self.visibility
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_busy(&self) -> bool {
        self.connection.is_busy()
    }

    pub fn ui(&self) -> &dyn ClientUi {
        self.ui.as_ref()
    }
}

fn log_send_error(error: &ClientError) {
    match error {
        ClientError::Encoding(e) => tracing::error!(error = %e, "Failed to encode command"),
        ClientError::Busy(generation) => {
            tracing::info!(generation, "Waiting for the server, command not sent")
        }
        other => tracing::warn!(error = %other, "Command not sent"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::testing::{RecordingSink, RecordingUi, UiCall};
    use eclipse_shared::{Colour, Race, TeamId};
    use std::time::Duration;

    struct Harness {
        session: SessionState,
        ui: RecordingUi,
        sink: RecordingSink,
    }

    fn harness_with(connection: ConnectionManager) -> Harness {
        let ui = RecordingUi::new();
        let sink = RecordingSink::new();
        let mut session = SessionState::new(Box::new(ui.clone()), connection);
        session.connect("ws://localhost:8998/p1").unwrap();
        session.on_open(Box::new(sink.clone())).unwrap();
        sink.take();
        ui.take();
        Harness { session, ui, sink }
    }

    fn harness() -> Harness {
        harness_with(ConnectionManager::new("ada"))
    }

    #[test]
    fn test_choose_team_flow_sends_one_command() {
        let mut h = harness();
        h.session
            .on_frame(r#"{"command": "choose_team", "races": ["orion", "human"]}"#);
        assert_eq!(h.session.current_action(), Some(ActionKind::ChooseTeam));

        h.session
            .input(ActionInput::choose_team(Race::Human, Colour::Blue))
            .unwrap();
        let outcome = h.session.confirm().unwrap();

        assert!(matches!(outcome, ConfirmOutcome::Sent { .. }));
        assert_eq!(
            h.sink.frames(),
            vec![r#"<command type="choose_team" race="human" colour="blue"/>"#.to_string()]
        );
        assert_eq!(h.session.current_action(), None);
        assert!(h.session.is_busy());
        assert_eq!(h.ui.visible("choose_team"), Some(false));
    }

    #[test]
    fn test_cancel_never_sends() {
        let mut h = harness();
        h.session.on_frame(r#"{"command": "upgrade"}"#);

        assert_eq!(h.session.cancel(), Some(ActionKind::Upgrade));

        assert!(h.sink.frames().is_empty());
        assert!(!h.session.is_busy());
        assert_eq!(h.ui.visible("choose_undo"), Some(false));
        assert_eq!(h.session.visibility().current_action_element(), None);
    }

    #[test]
    fn test_confirm_with_missing_input_keeps_stage() {
        let mut h = harness();
        h.session.activate(ActionKind::Research);

        assert_eq!(h.session.confirm().unwrap(), ConfirmOutcome::Incomplete);

        assert_eq!(h.session.current_action(), Some(ActionKind::Research));
        assert!(h.sink.frames().is_empty());
        assert!(!h.session.is_busy());
    }

    #[test]
    fn test_confirm_without_action_is_idle() {
        let mut h = harness();
        assert_eq!(h.session.confirm().unwrap(), ConfirmOutcome::Idle);
        assert!(h.sink.frames().is_empty());
    }

    #[test]
    fn test_new_stage_cleans_up_previous_exactly_once() {
        let mut h = harness();
        h.session.on_frame(r#"{"command": "upgrade"}"#);
        h.session.on_frame(r#"{"command": "explore", "positions": [4]}"#);

        let disabled = h
            .ui
            .calls()
            .into_iter()
            .filter(|c| *c == UiCall::Enabled("choose_undo_btn".into(), false))
            .count();
        assert_eq!(disabled, 1);
        assert_eq!(h.session.current_action(), Some(ActionKind::Explore));
        assert_eq!(
            h.session.visibility().current_action_element(),
            Some("choose_explore_pos")
        );
    }

    #[test]
    fn test_only_one_action_element_visible() {
        let mut h = harness();
        h.session.activate(ActionKind::Influence);
        h.session.input(ActionInput::position(2)).unwrap();
        h.session.activate(ActionKind::Research);

        assert_eq!(h.ui.visible("choose_influence_src"), Some(false));
        assert_eq!(h.ui.visible("choose_research"), Some(true));
    }

    #[test]
    fn test_response_clears_busy_exactly_once() {
        let mut h = harness();
        h.session.create_game().unwrap();
        assert!(h.session.is_busy());

        h.session.on_frame(r#"{"response": {}}"#);
        h.session.on_frame(r#"{"response": {}}"#);

        let clears = h
            .ui
            .calls()
            .into_iter()
            .filter(|c| *c == UiCall::Blanket(false))
            .count();
        assert_eq!(clears, 1);
        assert!(!h.session.is_busy());
    }

    #[test]
    fn test_unknown_command_changes_nothing() {
        let mut h = harness();
        h.session.activate(ActionKind::Upgrade);
        h.ui.take();

        h.session.on_frame(r#"{"command": "launch_fireworks", "x": 1}"#);

        assert_eq!(h.session.current_action(), Some(ActionKind::Upgrade));
        assert!(h.ui.calls().is_empty());
        assert!(h.sink.frames().is_empty());
    }

    #[test]
    fn test_malformed_frame_is_ignored() {
        let mut h = harness();
        h.session.on_frame("{not json");
        h.session.on_frame("");
        assert!(h.ui.calls().is_empty());
        assert_eq!(h.session.connection_state(), ConnectionState::Open);
    }

    #[test]
    fn test_close_cancels_action_and_clears_busy() {
        let mut h = harness();
        h.session.on_frame(r#"{"command": "explore", "positions": [1, 2]}"#);
        h.session.start_game().unwrap();
        h.sink.take();

        h.session.on_close();

        assert_eq!(h.session.connection_state(), ConnectionState::Closed);
        assert_eq!(h.session.current_action(), None);
        assert!(!h.session.is_busy());
        assert!(h.ui.calls().contains(&UiCall::SessionEnded));
        assert!(!h.session.on_heartbeat_tick());
        assert!(h.sink.frames().is_empty());
    }

    #[test]
    fn test_confirm_after_close_is_not_connected() {
        let mut h = harness();
        h.session.activate(ActionKind::Upgrade);
        h.session.on_close();
        h.session.activate(ActionKind::Upgrade);

        let err = h.session.confirm().unwrap_err();
        assert!(matches!(err, ClientError::NotConnected(ConnectionState::Closed)));
        assert_eq!(h.session.current_action(), Some(ActionKind::Upgrade));
    }

    #[test]
    fn test_input_without_action_is_rejected() {
        let mut h = harness();
        assert_eq!(
            h.session.input(ActionInput::position(1)),
            Err(InputRejected::NoActiveAction)
        );
    }

    #[test]
    fn test_team_effects_update_registry_and_tabs() {
        let mut h = harness();
        h.session.on_frame(
            r#"{"command": "update_teams", "teams": [{"id": "t1", "name": "Ada", "is_waiting": true}]}"#,
        );
        h.session
            .on_frame(r#"{"command": "update_passed", "id": "t1", "is_waiting": false}"#);
        h.session.on_frame(r#"{"command": "show_team", "id": "t1"}"#);

        let id = TeamId::new("t1");
        assert!(h.ui.calls().contains(&UiCall::TabLabel(id.clone(), "Ada*".into())));
        assert_eq!(
            h.ui.calls().into_iter().filter(|c| matches!(c, UiCall::TabLabel(..))).last(),
            Some(UiCall::TabLabel(id.clone(), "Ada".into()))
        );
        assert!(h.session.teams().is_current_team(&id));
        assert_eq!(h.ui.visible("team_page"), Some(true));
    }

    #[test]
    fn test_cancel_action_command_cancels_locally() {
        let mut h = harness();
        h.session.activate(ActionKind::Explore);
        h.session.on_frame(r#"{"command": "cancel_action"}"#);

        assert_eq!(h.session.current_action(), None);
        assert!(h.sink.frames().is_empty());
    }

    #[test]
    fn test_busy_blocks_further_requests() {
        let mut h = harness();
        h.session.create_game().unwrap();

        let err = h.session.join_game("g1").unwrap_err();
        assert!(matches!(err, ClientError::Busy(_)));
        assert_eq!(h.sink.frames(), vec![r#"<command type="create_game"/>"#.to_string()]);

        h.session.on_frame(r#"{"command": "choose_team"}"#);
        assert!(matches!(h.session.confirm(), Err(ClientError::Busy(_))));
        assert_eq!(h.session.current_action(), Some(ActionKind::ChooseTeam));

        h.session.on_frame(r#"{"response": 1}"#);
        assert!(!h.session.is_busy());
        assert!(matches!(
            h.session.confirm().unwrap(),
            ConfirmOutcome::Sent { .. }
        ));
        assert_eq!(h.session.current_action(), None);
        assert_eq!(h.sink.frames().len(), 2);
    }

    #[test]
    fn test_influence_is_two_round_trips() {
        let mut h = harness();
        h.session.on_frame(r#"{"command": "influence", "positions": [2, 3]}"#);
        h.session.input(ActionInput::position(3)).unwrap();
        h.session.confirm().unwrap();
        h.session.on_frame(r#"{"response": 1}"#);

        h.session.on_frame(r#"{"command": "influence_dst", "positions": [7]}"#);
        assert_eq!(
            h.session.visibility().current_action_element(),
            Some("choose_influence_dst")
        );
        h.session.input(ActionInput::position(7)).unwrap();
        h.session.confirm().unwrap();

        assert_eq!(
            h.sink.frames(),
            vec![
                r#"<command type="cmd_influence_src" pos="3"/>"#.to_string(),
                r#"<command type="cmd_influence_dst" pos="7"/>"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_send_keeps_stage() {
        let ui = RecordingUi::new();
        let mut sink = crate::ports::outbound::MockFrameSink::new();
        let mut writes = 0;
        sink.expect_send_text().returning(move |_| {
            writes += 1;
            if writes == 1 {
                Ok(())
            } else {
                Err(ClientError::Transport("writer gone".into()))
            }
        });
        let mut session = SessionState::new(Box::new(ui.clone()), ConnectionManager::new("ada"));
        session.connect("ws://localhost:8998/p1").unwrap();
        session.on_open(Box::new(sink)).unwrap();
        session.activate(ActionKind::Upgrade);

        assert!(matches!(session.confirm(), Err(ClientError::Transport(_))));

        assert_eq!(session.current_action(), Some(ActionKind::Upgrade));
        assert!(!session.is_busy());
        assert_eq!(ui.visible("choose_upgrade"), Some(true));
    }

    #[test]
    fn test_undo_on_server_is_a_normal_request() {
        let mut h = harness();
        h.session.undo_on_server().unwrap();
        assert_eq!(h.sink.frames(), vec![r#"<command type="undo"/>"#.to_string()]);
        assert!(h.session.is_busy());
    }

    #[test]
    fn test_late_response_after_timeout_is_harmless() {
        let mut h = harness_with(
            ConnectionManager::new("ada").with_request_timeout(Some(Duration::from_secs(1))),
        );
        let generation = h.session.commit().unwrap();

        assert!(h.session.request_deadline().is_some());
        assert!(h.session.on_request_timeout(generation));
        assert!(!h.session.is_busy());
        assert!(h.session.request_deadline().is_none());

        h.ui.take();
        h.session.on_frame(r#"{"response": "late"}"#);
        assert!(h.ui.calls().is_empty());
    }

    #[test]
    fn test_ignored_command_never_touches_ui() {
        // Any call on a mock without expectations panics.
        let ui = crate::ports::outbound::MockClientUi::new();
        let mut session = SessionState::new(Box::new(ui), ConnectionManager::new("ada"));

        session.dispatch(&ServerCommand::new("summon_dragon"));
        session.dispatch(&ServerCommand::new("show_team"));

        assert_eq!(session.current_action(), None);
        assert!(session.teams().is_empty());
    }

    #[test]
    fn test_bus_messages_drive_session() {
        let mut h = harness();
        h.session.handle(BusMessage::Lobby(LobbyRequest::JoinGame("g1".into())));
        h.session.on_frame(r#"{"response": 1}"#);
        h.session.on_frame(r#"{"command": "explore"}"#);
        h.session.handle(BusMessage::Input(ActionInput::position(6)));
        h.session.handle(BusMessage::Confirm);

        assert_eq!(
            h.sink.frames(),
            vec![
                r#"<command type="join_game" game="g1"/>"#.to_string(),
                r#"<command type="cmd_explore_pos" pos="6"/>"#.to_string(),
            ]
        );
    }
}
