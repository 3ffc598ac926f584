//! Bot configuration from the environment

use std::time::Duration;
use thiserror::Error;

pub const TOKEN_VAR: &str = "BOT_TOKEN";
const API_URL_VAR: &str = "BOT_API_URL";
const POLL_TIMEOUT_VAR: &str = "BOT_POLL_TIMEOUT_SECS";
const SESSION_IDLE_VAR: &str = "BOT_SESSION_IDLE_SECS";

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_IDLE_SECS: u64 = 600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOT_TOKEN is not set")]
    MissingToken,
    #[error("{var} must be a positive whole number of seconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout: Duration,
    /// Idle chats with no active flow release their runtime after this
    pub session_idle: Duration,
}

// Keep the token out of logs
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout", &self.poll_timeout)
            .field("session_idle", &self.session_idle)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let poll_timeout = seconds(&lookup, POLL_TIMEOUT_VAR, DEFAULT_POLL_TIMEOUT_SECS)?;
        let session_idle = seconds(&lookup, SESSION_IDLE_VAR, DEFAULT_SESSION_IDLE_SECS)?;

        Ok(Self {
            token,
            api_url,
            poll_timeout,
            session_idle,
        })
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match lookup(var) {
        None => Ok(Duration::from_secs(default)),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidNumber { var, value }),
        },
    }
}
