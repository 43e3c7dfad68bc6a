//! WebSocket Bridge - connects the CommandBus and the session to the socket.
//!
//! This module provides the `create_connection` function that sets up:
//! - A CommandBus for sending UI events
//! - A background task that owns the session and the socket
//!
//! The task polls socket reads, the heartbeat, the request timeout, the
//! command bus and the disconnect signal. Each branch calls one session
//! handler, which runs to completion before anything else is polled.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};

use super::desktop::{open_socket, Inbound};
use super::shared::COMMAND_CHANNEL_CAPACITY;
use crate::infrastructure::messaging::{
    BusMessage, CommandBus, ConnectionHandle, ConnectionStateObserver, StatusCells,
};
use crate::state::SessionState;

/// Result of creating a connection.
///
/// Contains all the pieces needed to use the connection:
/// - `command_bus`: Send UI events to the session
/// - `handle`: Control connection lifecycle
/// - `state_observer`: Observe connection state and busy flag (for UI binding)
pub struct Connection {
    pub command_bus: CommandBus,
    pub handle: ConnectionHandle,
    pub state_observer: ConnectionStateObserver,
}

pub fn create_connection(url: &str, session: SessionState, heartbeat: Duration) -> Connection {
    let (cmd_tx, cmd_rx) = mpsc::channel::<BusMessage>(COMMAND_CHANNEL_CAPACITY);
    let (disconnect_tx, disconnect_rx) = oneshot::channel::<()>();

    let status = StatusCells::new();
    let command_bus = CommandBus::new(cmd_tx);
    let state_observer = ConnectionStateObserver::new(status.clone());
    let handle = ConnectionHandle::new(status.clone(), disconnect_tx);

    let url = url.to_string();
    tokio::spawn(async move {
        bridge_task(url, session, heartbeat, cmd_rx, disconnect_rx, status).await;
    });

    Connection {
        command_bus,
        handle,
        state_observer,
    }
}

fn publish(status: &StatusCells, session: &SessionState) {
    status.publish(session.connection_state(), session.is_busy());
}

async fn bridge_task(
    url: String,
    mut session: SessionState,
    heartbeat: Duration,
    mut cmd_rx: mpsc::Receiver<BusMessage>,
    mut disconnect_rx: oneshot::Receiver<()>,
    status: StatusCells,
) {
    if let Err(e) = session.connect(&url) {
        tracing::error!("Failed to start connection: {}", e);
        return;
    }
    publish(&status, &session);

    let (sink, mut frames) = match open_socket(&url).await {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            session.on_close();
            publish(&status, &session);
            return;
        }
    };
    if let Err(e) = session.on_open(Box::new(sink)) {
        tracing::error!("Failed to register: {}", e);
        session.on_close();
        publish(&status, &session);
        return;
    }
    publish(&status, &session);

    let mut ticker = interval_at(Instant::now() + heartbeat, heartbeat);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut handle_dropped = false;

    loop {
        let deadline = session.request_deadline();
        let request_timeout = async move {
            match deadline {
                Some((generation, at)) => {
                    sleep_until(Instant::from_std(at)).await;
                    generation
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            // Handle disconnect request
            result = &mut disconnect_rx, if !handle_dropped => {
                match result {
                    Ok(()) => {
                        tracing::info!("Disconnect requested");
                        session.on_close();
                        break;
                    }
                    Err(_) => {
                        tracing::debug!("Connection handle dropped");
                        handle_dropped = true;
                    }
                }
            }

            // Inbound frames
            inbound = frames.next_frame() => match inbound {
                Inbound::Text(text) => session.on_frame(&text),
                Inbound::Closed => {
                    session.on_close();
                    break;
                }
            },

            _ = ticker.tick() => {
                session.on_heartbeat_tick();
            }

            generation = request_timeout => {
                session.on_request_timeout(generation);
            }

            // UI events
            message = cmd_rx.recv() => match message {
                Some(message) => session.handle(message),
                None => {
                    tracing::info!("Command channel closed");
                    session.on_close();
                    break;
                }
            },
        }

        publish(&status, &session);
    }

    publish(&status, &session);
}
