//! Client configuration loaded from environment

use std::time::Duration;

use url::Url;

use crate::error::ClientError;
use crate::infrastructure::websocket::shared::{DEFAULT_HEARTBEAT_SECS, DEFAULT_WS_URL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL; the player id is appended as the last path segment
    pub ws_url: String,
    pub player_id: String,
    /// Name sent with `register`
    pub player_name: String,
    pub heartbeat: Duration,
    /// Unset means an unacknowledged request keeps the UI busy indefinitely
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ws_url = lookup("ECLIPSE_WS_URL")
            .or_else(|| lookup("WEBSOCKET_URL"))
            .unwrap_or_else(|| DEFAULT_WS_URL.to_string());
        let player_id = lookup("ECLIPSE_PLAYER_ID")
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let player_name = lookup("ECLIPSE_PLAYER_NAME").unwrap_or_else(|| "player".to_string());

        let heartbeat_secs = match lookup("ECLIPSE_HEARTBEAT_SECS") {
            Some(raw) => parse_secs("ECLIPSE_HEARTBEAT_SECS", &raw)?,
            None => DEFAULT_HEARTBEAT_SECS,
        };
        let request_timeout = lookup("ECLIPSE_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_secs("ECLIPSE_REQUEST_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            ws_url,
            player_id,
            player_name,
            heartbeat: Duration::from_secs(heartbeat_secs),
            request_timeout,
        })
    }

    /// Socket endpoint: `<ws_url>/<player_id>`.
    pub fn endpoint(&self) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.ws_url)
            .map_err(|e| ClientError::Config(format!("ECLIPSE_WS_URL {:?}: {}", self.ws_url, e)))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ClientError::Unsupported(format!(
                "{} is not a WebSocket URL",
                self.ws_url
            )));
        }
        url.path_segments_mut()
            .map_err(|_| ClientError::Unsupported(format!("{} cannot take a path", self.ws_url)))?
            .pop_if_empty()
            .push(&self.player_id);
        Ok(url)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, ClientError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ClientError::Config(format!("{key} must be greater than zero"))),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ClientError::Config(format!("{key} {raw:?}: {e}"))),
    }
}

/// Load `.env.local` then `.env` from the working directory. Earlier files win.
pub fn load_dotenv() {
    for filename in [".env.local", ".env"] {
        let path = std::path::Path::new(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(path) {
                tracing::warn!(file = %filename, error = %e, "Failed to load env file");
            }
        }
    }
}
