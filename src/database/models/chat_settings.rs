//! Per-chat settings model.

use serde::{Deserialize, Serialize};

/// Default number of warnings before the auto-ban.
pub const DEFAULT_MAX_WARNS: u32 = 3;

/// Default number of messages allowed per flood window.
pub const DEFAULT_FLOOD_LIMIT: u32 = 8;

/// Default flood mute duration in minutes.
pub const DEFAULT_FLOOD_MUTE_MIN: u32 = 5;

/// Bounds for the warn threshold.
pub const MAX_WARNS_RANGE: (u32, u32) = (1, 10);

/// Bounds for the flood limit. The flood window holds 64 entries.
pub const FLOOD_LIMIT_RANGE: (u32, u32) = (1, 63);

/// Settings stored per chat in `settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatSettings {
    /// Whether new members get a welcome (and leavers a goodbye)
    #[serde(default = "default_welcome_on")]
    pub welcome_on: bool,

    /// Welcome template; `{mention}` is replaced with a user mention
    #[serde(default = "default_welcome_text")]
    pub welcome_text: String,

    /// Rules shown by /rules
    #[serde(default = "default_rules_text")]
    pub rules_text: String,

    /// Warnings before auto-ban
    #[serde(default = "default_max_warns")]
    pub max_warns: u32,

    /// Max messages per flood window
    #[serde(default = "default_flood_limit")]
    pub flood_limit: u32,

    /// Mute length for flooders
    #[serde(default = "default_flood_mute_min")]
    pub flood_mute_min: u32,
}

fn default_welcome_on() -> bool {
    true
}

fn default_welcome_text() -> String {
    "👋 Welcome {mention}! Please read the rules.".to_string()
}

fn default_rules_text() -> String {
    "📜 No spam. Be respectful.".to_string()
}

fn default_max_warns() -> u32 {
    DEFAULT_MAX_WARNS
}

fn default_flood_limit() -> u32 {
    DEFAULT_FLOOD_LIMIT
}

fn default_flood_mute_min() -> u32 {
    DEFAULT_FLOOD_MUTE_MIN
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            welcome_on: default_welcome_on(),
            welcome_text: default_welcome_text(),
            rules_text: default_rules_text(),
            max_warns: DEFAULT_MAX_WARNS,
            flood_limit: DEFAULT_FLOOD_LIMIT,
            flood_mute_min: DEFAULT_FLOOD_MUTE_MIN,
        }
    }
}

impl ChatSettings {
    /// Pull values read from disk back into their valid ranges.
    pub fn normalize(&mut self) {
        self.max_warns = clamp_max_warns(self.max_warns as i64);
        self.flood_limit = clamp_flood_limit(self.flood_limit as i64);
        self.flood_mute_min = self.flood_mute_min.max(1);
    }
}

/// Clamp a requested warn limit into [1, 10].
pub fn clamp_max_warns(requested: i64) -> u32 {
    clamp_into(requested, MAX_WARNS_RANGE)
}

/// Clamp a requested flood limit into [1, 63].
pub fn clamp_flood_limit(requested: i64) -> u32 {
    clamp_into(requested, FLOOD_LIMIT_RANGE)
}

fn clamp_into(requested: i64, (min, max): (u32, u32)) -> u32 {
    requested.clamp(min as i64, max as i64) as u32
}
