//! Application-wide error types using thiserror.

use hugbot_common::{HugError, NotifyError};
use poise::serenity_prelude as serenity;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] HugError),

    /// The bot token was rejected or `/users/@me` could not be fetched.
    #[error("Failed to look up bot identity: {0}")]
    Identity(#[source] serenity::Error),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// The notifier could not be constructed.
    #[error("Notifier error: {0}")]
    Notifier(#[from] NotifyError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
