//! Configuration loading from an optional TOML file and the environment.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, a `.env` file
//! in the working directory (never overriding variables already set), then
//! the process environment.

use crate::schema::Config;
use hugbot_common::{HugError, LogFormat, Result, Secret};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "HUGBOT_CONFIG";

/// Configuration loader.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    dotenv: Option<PathBuf>,
}

impl ConfigLoader {
    /// Creates a loader reading the given TOML file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            dotenv: None,
        }
    }

    /// Creates a loader using `$HUGBOT_CONFIG` (if set) and `./.env`.
    pub fn from_env() -> Self {
        Self {
            path: env::var_os(CONFIG_PATH_VAR).map(PathBuf::from),
            dotenv: Some(PathBuf::from(".env")),
        }
    }

    /// Overrides the TOML file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets a dotenv file to seed the environment from.
    #[must_use]
    pub fn with_dotenv(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv = Some(path.into());
        self
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> Result<Config> {
        if let Some(dotenv) = &self.dotenv {
            load_dotenv_if_present(dotenv)?;
        }

        let mut config = match &self.path {
            Some(path) => load_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }
}

/// Reads a TOML configuration file; missing sections fall back to defaults.
pub fn load_file(path: &Path) -> Result<Config> {
    debug!("Reading configuration from {}", path.display());
    let contents = fs::read_to_string(path)?;
    parse_toml(&contents)
}

/// Parses a TOML configuration document.
pub fn parse_toml(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| HugError::config(format!("Invalid TOML: {e}")))
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup("DISCORD_TOKEN") {
        config.discord.token = Secret::from(token);
    }
    if let Some(token) = lookup("PUSHOVER_API_TOKEN") {
        config.pushover.api_token = Secret::from(token);
    }
    if let Some(key) = lookup("PUSHOVER_USER_KEY") {
        config.pushover.user_key = Secret::from(key);
    }
    if let Some(url) = lookup("PUSHOVER_API_URL") {
        config.pushover.api_url = url;
    }
    if let Some(sound) = lookup("PUSHOVER_SOUND") {
        config.pushover.sound = sound;
    }
    if let Some(trigger) = lookup("HUGBOT_TRIGGER") {
        config.requests.trigger = trigger;
    }
    if let Some(hours) = lookup("HUGBOT_COOLDOWN_HOURS") {
        config.requests.cooldown_hours = hours.trim().parse().map_err(|_| {
            HugError::config(format!("HUGBOT_COOLDOWN_HOURS must be a whole number, got '{hours}'"))
        })?;
    }
    if let Some(level) = lookup("RUST_LOG") {
        config.logging.level = level;
    }
    if let Some(format) = lookup("HUGBOT_LOG_FORMAT") {
        config.logging.format = format.parse::<LogFormat>()?;
    }
    Ok(())
}

/// Seeds the process environment from a dotenv file.
///
/// A missing file is not an error and variables that are already set win.
pub fn load_dotenv_if_present(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No dotenv file at {}", path.display());
            Ok(())
        }
        Err(e) => Err(HugError::config(format!(
            "Invalid dotenv file {}: {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_secrets_and_settings() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[
                ("DISCORD_TOKEN", "discord"),
                ("PUSHOVER_API_TOKEN", "app"),
                ("PUSHOVER_USER_KEY", "user"),
                ("HUGBOT_COOLDOWN_HOURS", "12"),
                ("HUGBOT_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.discord.token.expose(), "discord");
        assert_eq!(config.pushover.api_token.expose(), "app");
        assert_eq!(config.pushover.user_key.expose(), "user");
        assert_eq!(config.requests.cooldown_hours, 12);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.requests.trigger, "hug");
    }

    #[test]
    fn bad_cooldown_hours_is_rejected() {
        let mut config = Config::default();
        let err = apply_env_overrides(&mut config, lookup_from(&[("HUGBOT_COOLDOWN_HOURS", "a day")]))
            .unwrap_err();
        assert!(err.to_string().contains("HUGBOT_COOLDOWN_HOURS"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = parse_toml("[requests]\ntrigger = \"hugs\"\n").unwrap();
        assert_eq!(config.requests.trigger, "hugs");
        assert_eq!(config.requests.cooldown_hours, 24);
        assert_eq!(config.pushover.sound, "bingbong");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = parse_toml("[requests\n").unwrap_err();
        assert!(matches!(err, HugError::Config(_)));
    }
}
