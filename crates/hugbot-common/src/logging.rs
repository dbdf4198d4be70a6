//! Structured logging infrastructure for HugBot

use crate::types::{HugError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output style of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output with colors
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl FromStr for LogFormat {
    type Err = HugError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(HugError::config(format!(
                "Unknown log format '{other}' (expected pretty, compact or json)"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "hugbot=debug,serenity=warn")
    pub level: String,
    /// Output style
    pub format: LogFormat,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,serenity=warn,tracing::span=warn".to_string(),
            format: LogFormat::Pretty,
            include_targets: true,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration
///
/// Falls back to `info` when the configured filter directive does not parse.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| HugError::Logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_fmt::layer()
                    .json()
                    .with_target(config.include_targets)
                    .with_current_span(true),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_fmt::layer()
                    .compact()
                    .with_target(config.include_targets),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_fmt::layer()
                    .pretty()
                    .with_target(config.include_targets)
                    .with_thread_names(true),
            )
            .try_init(),
    };

    result.map_err(|e| HugError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn default_config_uses_pretty_output() {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.level.starts_with("info"));
    }

    #[test]
    fn second_init_reports_error_instead_of_panicking() {
        let config = LoggingConfig {
            level: "not a valid [directive".to_string(),
            format: LogFormat::Compact,
            include_targets: false,
        };
        // The first call may or may not win depending on test ordering.
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
