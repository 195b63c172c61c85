use bevy::prelude::*;
use std::time::Duration;

const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:5000";
const DEFAULT_TICK_HZ: f64 = 10.0;
const DEFAULT_PENDING_RETRY_LIMIT: u32 = 30;
const DEFAULT_RECONNECT_DELAY_MS: u64 = 2000;

/// Client-wide settings, read once at startup.
#[derive(Resource, Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint of the game server.
    pub server_url: String,
    /// Simulation ticks per second.
    pub tick_hz: f64,
    /// How many ticks a deferred command is retried before it is dropped.
    pub pending_retry_limit: u32,
    /// When set, `Update` only overwrites components that already exist.
    pub strict_update: bool,
    /// Pause between reconnect attempts.
    pub reconnect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            tick_hz: DEFAULT_TICK_HZ,
            pending_retry_limit: DEFAULT_PENDING_RETRY_LIMIT,
            strict_update: false,
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Builds the config from `MMO_*` environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_url: std::env::var("MMO_SERVER_URL").unwrap_or(defaults.server_url),
            tick_hz: env_parse("MMO_TICK_HZ")
                .filter(|hz: &f64| *hz > 0.0)
                .unwrap_or(defaults.tick_hz),
            pending_retry_limit: env_parse("MMO_PENDING_RETRY_LIMIT")
                .unwrap_or(defaults.pending_retry_limit),
            strict_update: env_parse("MMO_STRICT_UPDATE").unwrap_or(defaults.strict_update),
            reconnect_delay: env_parse("MMO_RECONNECT_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.reconnect_delay),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}
