//! Eclipse Player - headless client binary.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eclipse_player::application::services::{ActionService, LobbyService};
use eclipse_player::config::{load_dotenv, ClientConfig};
use eclipse_player::console::{parse_line, ConsoleCommand};
use eclipse_player::infrastructure::{ConnectionState, TracingUi};
use eclipse_player::ports::outbound::ClientUi;
use eclipse_player::{create_connection, ClientError, ConnectionManager, SessionState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eclipse_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Eclipse Player");

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let ui = TracingUi::new();
    let endpoint = match config.endpoint() {
        Ok(url) => url,
        Err(e @ ClientError::Unsupported(_)) => {
            ui.alert(&e.to_string());
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let manager = ConnectionManager::new(config.player_name.clone())
        .with_request_timeout(config.request_timeout);
    let session = SessionState::new(Box::new(ui), manager);
    let connection = create_connection(endpoint.as_str(), session, config.heartbeat);

    let actions = ActionService::new(connection.command_bus.clone());
    let lobby = LobbyService::new(connection.command_bus.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if connection.state_observer.state() == ConnectionState::Closed {
            tracing::warn!("Connection closed");
            break;
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(help) => {
                tracing::info!("{}", help);
                continue;
            }
        };

        let sent = match command {
            ConsoleCommand::Empty => Ok(()),
            ConsoleCommand::Quit => break,
            ConsoleCommand::CreateGame => lobby.create_game(),
            ConsoleCommand::JoinGame(game) => lobby.join_game(&game),
            ConsoleCommand::ExitGame => lobby.exit_game(),
            ConsoleCommand::StartGame => lobby.start_game(),
            ConsoleCommand::Commit => lobby.commit(),
            ConsoleCommand::Undo => lobby.undo(),
            ConsoleCommand::StartAction(kind) => actions.start(kind),
            ConsoleCommand::ChooseTeam(race, colour) => actions.choose_team(race, colour),
            ConsoleCommand::Technology(id) => actions.choose_technology(&id),
            ConsoleCommand::Position(index) => actions.choose_position(index),
            ConsoleCommand::Confirm => actions.confirm(),
            ConsoleCommand::Cancel => actions.cancel(),
        };
        if let Err(e) = sent {
            tracing::error!("{}", e);
        }
    }

    connection.handle.disconnect();
    tracing::info!("Shutting down");
    Ok(())
}
