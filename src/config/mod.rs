//! Configuration module for Warden bot.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

/// Default webhook listen port.
const DEFAULT_WEBHOOK_PORT: u16 = 8443;

/// Bot running mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Fatal configuration problems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOT_TOKEN must be set")]
    MissingToken,

    #[error("WEBHOOK_URL must be set when BOT_MODE is webhook")]
    MissingWebhookUrl,

    #[error("WEBHOOK_PORT is not a valid port: {0}")]
    InvalidWebhookPort(String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Owner user IDs. These users pass the admin gate in every chat.
    pub owner_ids: Vec<u64>,

    /// Directory holding the JSON tables.
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let bot_mode = match lookup("BOT_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = lookup("WEBHOOK_URL").filter(|s| !s.trim().is_empty());
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(ConfigError::MissingWebhookUrl);
        }

        let webhook_port = match lookup("WEBHOOK_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidWebhookPort(raw))?,
            None => DEFAULT_WEBHOOK_PORT,
        };

        let webhook_secret = lookup("WEBHOOK_SECRET").filter(|s| !s.is_empty());

        let owner_ids = parse_owner_ids(&lookup("OWNER_ID").unwrap_or_default());

        let data_dir = lookup("DATA_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            bot_token,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret,
            owner_ids,
            data_dir,
        })
    }
}

/// Parse a comma-separated list of numeric owner ids.
///
/// Entries that are not integers are skipped with a warning.
fn parse_owner_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("OWNER_ID entry {:?} is not a numeric Telegram id, ignoring", s);
                None
            }
        })
        .collect()
}

/// Mask a bot token for logging.
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "<missing>".to_string();
    }
    let chars: Vec<char> = token.chars().collect();
    let head: String = chars.iter().take(6).collect();
    if token.contains(':') && chars.len() > 12 {
        let tail: String = chars[chars.len() - 6..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        format!("{}...", head)
    }
}
