//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use hugbot_common::{HugError, Result};
use tracing::warn;
use url::Url;

/// Longest accepted cooldown, ten years.
pub const MAX_COOLDOWN_HOURS: u32 = 87_600;

impl Config {
    /// Validates the configuration.
    ///
    /// Every problem is reported at once so a misconfigured deployment can be
    /// fixed in one go.
    pub fn validate(&self) -> Result<()> {
        let problems = ConfigValidator::problems(self);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(HugError::config(problems.join("; ")))
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    pub fn validate(config: &Config) -> Result<()> {
        config.validate()
    }

    /// Lists every validation problem found in `config`.
    pub fn problems(config: &Config) -> Vec<String> {
        let mut problems = Vec::new();

        if config.discord.token.is_blank() {
            problems.push("Discord token cannot be empty (set DISCORD_TOKEN)".to_string());
        } else if !config.discord.token.expose().contains('.') {
            warn!("Discord token format may be invalid (missing dots)");
        }

        if config.pushover.api_token.is_blank() {
            problems.push("Pushover API token cannot be empty (set PUSHOVER_API_TOKEN)".to_string());
        }
        if config.pushover.user_key.is_blank() {
            problems.push("Pushover user key cannot be empty (set PUSHOVER_USER_KEY)".to_string());
        }

        match Url::parse(&config.pushover.api_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => problems.push(format!(
                "Pushover API URL must use http or https, got '{}'",
                url.scheme()
            )),
            Err(e) => problems.push(format!("Pushover API URL is invalid: {e}")),
        }

        if !(-2..=2).contains(&config.pushover.priority) {
            problems.push(format!(
                "Pushover priority must be between -2 and 2, got {}",
                config.pushover.priority
            ));
        }
        if config.pushover.timeout_secs == 0 {
            problems.push("Pushover timeout must be at least one second".to_string());
        }

        if config.requests.trigger.is_empty() {
            problems.push("Trigger keyword cannot be empty".to_string());
        }
        if config.requests.cooldown_hours == 0 {
            problems.push("Cooldown must be at least one hour".to_string());
        } else if config.requests.cooldown_hours > MAX_COOLDOWN_HOURS {
            problems.push(format!(
                "Cooldown cannot exceed {MAX_COOLDOWN_HOURS} hours, got {}",
                config.requests.cooldown_hours
            ));
        }

        problems
    }
}
