//! Integration tests for the hugbot crate.
//!
//! These cover startup wiring that does not need a live Discord session.

use chrono::Duration;
use hugbot::{build_handler, intents, BotError};
use hugbot_commands::{InboundMessage, Reply};
use hugbot_common::test_utils::{discord_fixtures, init_test_logging};
use hugbot_common::{HugError, Secret};
use hugbot_config::Config;
use poise::serenity_prelude::GatewayIntents;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.discord.token = Secret::new("abc.def.ghi");
    config.pushover.api_token = Secret::new("app-token");
    config.pushover.user_key = Secret::new("user-key");
    config
}

#[test]
fn test_only_direct_messages_are_subscribed() {
    let intents = intents();
    assert!(intents.contains(GatewayIntents::DIRECT_MESSAGES));
    assert!(!intents.contains(GatewayIntents::GUILD_MESSAGES));
    assert!(!intents.contains(GatewayIntents::MESSAGE_CONTENT));
}

#[test]
fn test_build_handler_uses_configured_cooldown() {
    init_test_logging();
    let mut config = valid_config();
    config.requests.cooldown_hours = 6;

    let handler = build_handler(&config, discord_fixtures::bot_user_id()).unwrap();

    assert_eq!(handler.bot_id(), discord_fixtures::bot_user_id());
    assert_eq!(handler.gate().window(), Duration::hours(6));
    assert!(handler.gate().is_empty());
}

#[tokio::test]
async fn test_built_handler_answers_non_trigger_without_network() {
    let handler = build_handler(&valid_config(), discord_fixtures::bot_user_id()).unwrap();
    let message = InboundMessage {
        author_id: discord_fixtures::test_user_id(),
        author_name: "bob".to_string(),
        channel_id: discord_fixtures::test_channel_id(),
        content: "hello".to_string(),
    };

    assert_eq!(handler.handle(&message).await, Some(Reply::Usage));
}

#[test]
fn test_config_errors_are_reported_as_startup_failures() {
    let err: BotError = Config::default().validate().unwrap_err().into();
    assert!(matches!(err, BotError::Config(HugError::Config(_))));
    assert!(err.to_string().contains("DISCORD_TOKEN"));
}
