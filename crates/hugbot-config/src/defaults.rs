//! Default values.

use crate::schema::{Config, DiscordConfig, RequestsConfig};
use hugbot_common::{LoggingConfig, PushoverConfig, Secret};

impl Default for Config {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            pushover: PushoverConfig::default(),
            requests: RequestsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: Secret::default(),
            status_text: "Accepting hug requests, DM me for more details!".to_string(),
        }
    }
}

impl Default for RequestsConfig {
    fn default() -> Self {
        Self {
            trigger: "hug".to_string(),
            cooldown_hours: 24,
            confirmation_text: "Your hug request has been sent!".to_string(),
            cooldown_text: "It has not been 24 hours since your last hug request!".to_string(),
            usage_text: "Please send me `hug` to request a hug. Note, this can be only done once every 24 hours."
                .to_string(),
        }
    }
}
