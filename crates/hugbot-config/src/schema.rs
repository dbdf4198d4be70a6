//! Configuration schema definitions using serde.

use hugbot_common::{LoggingConfig, PushoverConfig, Secret};
use serde::{Deserialize, Serialize};

/// Main configuration structure for HugBot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Pushover configuration.
    pub pushover: PushoverConfig,
    /// Hug request handling.
    pub requests: RequestsConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: Secret,
    /// "Playing" status shown on the bot's profile.
    pub status_text: String,
}

/// Hug request handling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestsConfig {
    /// Exact, case-sensitive message that triggers a request.
    pub trigger: String,
    /// Hours a user must wait between two requests.
    pub cooldown_hours: u32,
    /// Reply when a request was dispatched.
    pub confirmation_text: String,
    /// Reply when the user is still cooling down.
    pub cooldown_text: String,
    /// Reply to any other message.
    pub usage_text: String,
}
