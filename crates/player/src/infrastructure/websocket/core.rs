//! Runtime-free core of the server connection.
//!
//! This is deliberately free of tokio and of the socket itself. The desktop
//! bridge owns the socket and the timers and calls into this core for state
//! transitions, frame routing, keep-alive and the busy indicator.

use std::time::{Duration, Instant};

use eclipse_shared::{parse_server_frame, CommandDocument, ServerCommand, ServerFrame};

use super::message_builder::CommandBuilder;
use super::shared::HEARTBEAT_FRAME;
use crate::error::ClientError;
use crate::infrastructure::messaging::ConnectionState;
use crate::ports::outbound::{ClientUi, FrameSink};

/// Outstanding-request flag with a generation counter.
///
/// Each raise gets a new generation, so a stale timeout can never clear a
/// newer request.
#[derive(Debug, Default)]
pub struct BusyIndicator {
    generation: u64,
    raised_at: Option<Instant>,
}

impl BusyIndicator {
    pub fn raise(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        self.raised_at = Some(now);
        self.generation
    }

    /// Returns true if the flag was set.
    pub fn clear(&mut self) -> bool {
        self.raised_at.take().is_some()
    }

    pub fn clear_generation(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.clear()
    }

    pub fn is_busy(&self) -> bool {
        self.raised_at.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation and raise time of the outstanding request.
    pub fn pending(&self) -> Option<(u64, Instant)> {
        self.raised_at.map(|at| (self.generation, at))
    }
}

/// Connection state machine: `Disconnected → Connecting → Open → Closed`.
pub struct ConnectionManager {
    state: ConnectionState,
    player_name: String,
    sink: Option<Box<dyn FrameSink>>,
    heartbeat_active: bool,
    busy: BusyIndicator,
    request_timeout: Option<Duration>,
}

impl ConnectionManager {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            player_name: player_name.into(),
            sink: None,
            heartbeat_active: false,
            busy: BusyIndicator::default(),
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn heartbeat_active(&self) -> bool {
        self.heartbeat_active
    }

    pub fn connect(&mut self, url: &str) -> Result<(), ClientError> {
        self.transition(ConnectionState::Disconnected, ConnectionState::Connecting)?;
        tracing::info!(url = %url, "Connecting");
        Ok(())
    }

    /// Socket is open: register and start the keep-alive.
    pub fn on_open(&mut self, sink: Box<dyn FrameSink>) -> Result<(), ClientError> {
        self.transition(ConnectionState::Connecting, ConnectionState::Open)?;
        self.sink = Some(sink);
        self.heartbeat_active = true;

        let register = CommandBuilder::register(&self.player_name)?;
        self.write(register.to_xml())?;
        tracing::info!(player = %self.player_name, "Connection open, registered");
        Ok(())
    }

    /// Socket closed. No retry; returns false if it was already closed.
    pub fn on_close(&mut self, ui: &dyn ClientUi) -> bool {
        match self.state {
            ConnectionState::Closed => return false,
            ConnectionState::Disconnected => {
                tracing::debug!("Close before connect ignored");
                return false;
            }
            ConnectionState::Connecting | ConnectionState::Open => {}
        }

        self.state = ConnectionState::Closed;
        self.sink = None;
        self.heartbeat_active = false;
        if self.busy.clear() {
            tracing::debug!("Outstanding request dropped on close");
        }
        ui.show_blanket(false);
        ui.show_session_ended();
        tracing::warn!(error = %ClientError::ConnectionLost, "Session ended");
        true
    }

    /// Keep-alive tick. Sends only while open; returns whether a frame went out.
    pub fn on_heartbeat_tick(&mut self) -> bool {
        if self.state != ConnectionState::Open || !self.heartbeat_active {
            return false;
        }
        match self.write(HEARTBEAT_FRAME.to_string()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Heartbeat failed");
                false
            }
        }
    }

    /// Route one inbound text frame.
    ///
    /// Returns the command for the dispatcher, if the frame carried one.
    pub fn on_frame(&mut self, text: &str, ui: &dyn ClientUi) -> Option<ServerCommand> {
        if self.state != ConnectionState::Open {
            tracing::debug!(state = ?self.state, "Frame outside open connection dropped");
            return None;
        }

        let frame = match parse_server_frame(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse server frame");
                return None;
            }
        };

        match frame {
            ServerFrame::Command(command) => {
                if self.busy.is_busy() {
                    tracing::debug!(
                        command = %command.kind(),
                        generation = self.busy.generation(),
                        "Command received while a request is outstanding"
                    );
                }
                Some(command)
            }
            ServerFrame::Response(_) => {
                if self.busy.clear() {
                    ui.show_blanket(false);
                } else {
                    tracing::debug!("Response with no outstanding request");
                }
                None
            }
            ServerFrame::Unrecognized => {
                tracing::debug!("Unrecognized frame shape ignored");
                None
            }
        }
    }

    /// Serialize and transmit a UI-triggered command, then raise busy.
    ///
    /// Only one request may be outstanding: while busy nothing is written.
    /// Returns the busy generation of this request.
    pub fn send_command(
        &mut self,
        doc: CommandDocument,
        ui: &dyn ClientUi,
    ) -> Result<u64, ClientError> {
        if self.state != ConnectionState::Open {
            return Err(ClientError::NotConnected(self.state));
        }
        if let Some((generation, _)) = self.busy.pending() {
            return Err(ClientError::Busy(generation));
        }
        tracing::debug!(command = %doc.kind(), "Sending command");
        self.write(doc.to_xml())?;

        let generation = self.busy.raise(Instant::now());
        ui.show_blanket(true);
        Ok(generation)
    }

    /// The request of `generation` was not acknowledged in time.
    pub fn on_request_timeout(&mut self, generation: u64, ui: &dyn ClientUi) -> bool {
        if !self.busy.clear_generation(generation) {
            return false;
        }
        tracing::warn!(generation, "Request not acknowledged in time, clearing busy");
        ui.show_blanket(false);
        true
    }

    /// When the outstanding request times out, if a timeout is configured.
    pub fn request_deadline(&self) -> Option<(u64, Instant)> {
        let timeout = self.request_timeout?;
        self.busy
            .pending()
            .map(|(generation, at)| (generation, at + timeout))
    }

    fn transition(
        &mut self,
        from: ConnectionState,
        to: ConnectionState,
    ) -> Result<(), ClientError> {
        if self.state != from {
            return Err(ClientError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    fn write(&mut self, frame: String) -> Result<(), ClientError> {
        let sink = self
            .sink
            .as_mut()
            .ok_or(ClientError::NotConnected(self.state))?;
        sink.send_text(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::testing::{RecordingSink, RecordingUi, UiCall};
    use crate::ports::outbound::MockFrameSink;

    fn open_manager() -> (ConnectionManager, RecordingSink) {
        let sink = RecordingSink::default();
        let mut manager = ConnectionManager::new("ada");
        manager.connect("ws://localhost:8998/p1").unwrap();
        manager.on_open(Box::new(sink.clone())).unwrap();
        sink.take();
        (manager, sink)
    }

    #[test]
    fn test_open_registers_without_busy() {
        let sink = RecordingSink::default();
        let mut manager = ConnectionManager::new("ada");

        manager.connect("ws://localhost:8998/p1").unwrap();
        assert_eq!(manager.state(), ConnectionState::Connecting);
        manager.on_open(Box::new(sink.clone())).unwrap();

        assert_eq!(manager.state(), ConnectionState::Open);
        assert_eq!(
            sink.frames(),
            vec![r#"<command type="register" player="ada"/>"#.to_string()]
        );
        assert!(!manager.is_busy());
        assert!(manager.heartbeat_active());
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let mut manager = ConnectionManager::new("ada");
        let err = manager.on_open(Box::new(MockFrameSink::new())).unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidTransition {
                from: ConnectionState::Disconnected,
                to: ConnectionState::Open
            }
        ));

        manager.connect("ws://a").unwrap();
        assert!(manager.connect("ws://b").is_err());
        assert_eq!(manager.state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_send_raises_busy_and_response_clears_it_once() {
        let ui = RecordingUi::new();
        let (mut manager, sink) = open_manager();

        manager
            .send_command(CommandBuilder::commit(), &ui)
            .unwrap();
        assert!(manager.is_busy());
        assert_eq!(sink.frames(), vec![r#"<command type="commit"/>"#.to_string()]);
        assert_eq!(ui.blanket(), Some(true));

        assert!(manager.on_frame(r#"{"response": "ok"}"#, &ui).is_none());
        assert!(!manager.is_busy());
        assert_eq!(ui.blanket(), Some(false));

        ui.take();
        manager.on_frame(r#"{"response": "ok"}"#, &ui);
        assert!(ui.calls().is_empty());
    }

    #[test]
    fn test_heartbeat_only_while_open() {
        let ui = RecordingUi::new();
        let (mut manager, sink) = open_manager();

        assert!(manager.on_heartbeat_tick());
        assert_eq!(sink.take(), vec![String::new()]);
        assert!(!manager.is_busy());

        manager.on_close(&ui);
        assert!(!manager.on_heartbeat_tick());
        assert!(sink.frames().is_empty());
    }

    #[test]
    fn test_close_clears_busy_and_is_idempotent() {
        let ui = RecordingUi::new();
        let (mut manager, _sink) = open_manager();
        manager.send_command(CommandBuilder::start_game(), &ui).unwrap();

        assert!(manager.on_close(&ui));
        assert_eq!(manager.state(), ConnectionState::Closed);
        assert!(!manager.is_busy());
        assert_eq!(ui.blanket(), Some(false));
        assert!(ui.calls().contains(&UiCall::SessionEnded));

        ui.take();
        assert!(!manager.on_close(&ui));
        assert!(ui.calls().is_empty());
    }

    #[test]
    fn test_send_after_close_is_not_connected() {
        let ui = RecordingUi::new();
        let (mut manager, sink) = open_manager();
        manager.on_close(&ui);

        let err = manager
            .send_command(CommandBuilder::commit(), &ui)
            .unwrap_err();
        assert!(matches!(err, ClientError::NotConnected(ConnectionState::Closed)));
        assert!(sink.frames().is_empty());
    }

    #[test]
    fn test_frames_are_routed_by_shape() {
        let ui = RecordingUi::new();
        let (mut manager, _sink) = open_manager();

        let command = manager.on_frame(r#"{"command": "upgrade"}"#, &ui).unwrap();
        assert_eq!(command.kind(), "upgrade");

        assert!(manager.on_frame("not json", &ui).is_none());
        assert!(manager.on_frame(r#"{"hello": 1}"#, &ui).is_none());
        assert!(manager.on_frame("[1, 2]", &ui).is_none());
        assert!(ui.calls().is_empty());
    }

    #[test]
    fn test_send_while_busy_is_refused() {
        let ui = RecordingUi::new();
        let (mut manager, sink) = open_manager();
        let first = manager.send_command(CommandBuilder::create_game(), &ui).unwrap();

        let err = manager
            .send_command(CommandBuilder::join_game("g1").unwrap(), &ui)
            .unwrap_err();
        assert!(matches!(err, ClientError::Busy(g) if g == first));
        assert_eq!(sink.take(), vec![r#"<command type="create_game"/>"#.to_string()]);

        manager.on_frame(r#"{"response": 1}"#, &ui);
        let second = manager
            .send_command(CommandBuilder::join_game("g1").unwrap(), &ui)
            .unwrap();
        assert_eq!(second, first + 1);
        assert!(manager.is_busy());
    }

    #[test]
    fn test_command_frame_does_not_clear_busy() {
        let ui = RecordingUi::new();
        let (mut manager, _sink) = open_manager();
        manager.send_command(CommandBuilder::create_game(), &ui).unwrap();

        assert!(manager.on_frame(r#"{"command": "show", "panel": "lobby_panel"}"#, &ui).is_some());
        assert!(manager.is_busy());
    }

    #[test]
    fn test_timeout_only_clears_its_own_generation() {
        let ui = RecordingUi::new();
        let (mut manager, _sink) = open_manager();
        manager = manager.with_request_timeout(Some(Duration::from_secs(5)));

        let first = manager.send_command(CommandBuilder::commit(), &ui).unwrap();
        manager.on_frame(r#"{"response": null}"#, &ui);
        let second = manager.send_command(CommandBuilder::commit(), &ui).unwrap();

        assert!(!manager.on_request_timeout(first, &ui));
        assert!(manager.is_busy());

        let (generation, _) = manager.request_deadline().unwrap();
        assert_eq!(generation, second);
        assert!(manager.on_request_timeout(second, &ui));
        assert!(!manager.is_busy());

        ui.take();
        manager.on_frame(r#"{"response": null}"#, &ui);
        assert!(!manager.is_busy());
        assert!(ui.calls().is_empty());
    }

    #[test]
    fn test_no_deadline_without_timeout() {
        let ui = RecordingUi::new();
        let (mut manager, _sink) = open_manager();
        manager.send_command(CommandBuilder::commit(), &ui).unwrap();
        assert!(manager.request_deadline().is_none());
    }

    #[test]
    fn test_sink_failure_does_not_raise_busy() {
        let ui = RecordingUi::new();
        let mut sink = MockFrameSink::new();
        let mut writes = 0;
        sink.expect_send_text().returning(move |_| {
            writes += 1;
            if writes == 1 {
                Ok(())
            } else {
                Err(ClientError::Transport("writer gone".into()))
            }
        });

        let mut manager = ConnectionManager::new("ada");
        manager.connect("ws://a").unwrap();
        manager.on_open(Box::new(sink)).unwrap();

        assert!(manager.send_command(CommandBuilder::commit(), &ui).is_err());
        assert!(!manager.is_busy());
    }
}
