//! Pushover API client used to deliver hug requests
//!
//! A single `POST` of a JSON message per request. The response body is not
//! read; any transport failure or non-2xx status is returned as a
//! [`NotifyError`] and never retried.

use crate::types::{Secret, UserId};
use crate::utils::truncate_string;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Default Pushover messages endpoint.
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Base of the deep link that opens a DM with the requester.
pub const DISCORD_DM_LINK_BASE: &str = "https://discord.com/channels/@me";

/// Pushover rejects message bodies longer than this many characters.
const MAX_MESSAGE_CHARS: usize = 1024;

/// Errors that can occur while dispatching a notification
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request body could not be encoded.
    #[error("Failed to encode notification body: {0}")]
    Encode(#[from] serde_json::Error),

    /// Connection, TLS or timeout failure.
    #[error("Failed to send notification: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Notification service returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the service
        status: u16,
    },
}

/// Result type for notification dispatch.
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

/// A hug request that passed the cooldown gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HugRequest {
    /// Discord ID of the user asking for a hug
    pub requester_id: UserId,
    /// Discord username of the requester
    pub requester_name: String,
}

impl HugRequest {
    /// Creates a new request.
    pub fn new(requester_id: UserId, requester_name: impl Into<String>) -> Self {
        Self {
            requester_id,
            requester_name: requester_name.into(),
        }
    }

    /// Deep link back into a DM with the requester.
    #[must_use]
    pub fn dm_link(&self) -> String {
        format!("{DISCORD_DM_LINK_BASE}/{}", self.requester_id)
    }
}

/// Outbound notification channel for hug requests.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification for the request.
    async fn notify(&self, request: &HugRequest) -> NotifyResult<()>;
}

/// Configuration for the Pushover client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushoverConfig {
    /// Messages endpoint
    pub api_url: String,
    /// Application API token
    pub api_token: Secret,
    /// Recipient user or group key
    pub user_key: Secret,
    /// Notification sound name
    pub sound: String,
    /// Message priority, -2 (lowest) to 2 (emergency)
    pub priority: i8,
    /// Title shown for the deep link
    pub url_title: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PushoverConfig {
    fn default() -> Self {
        Self {
            api_url: PUSHOVER_API_URL.to_string(),
            api_token: Secret::default(),
            user_key: Secret::default(),
            sound: "bingbong".to_string(),
            priority: 0,
            url_title: "Send hug".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Body of a Pushover `messages.json` request.
#[derive(Debug, Serialize)]
pub struct PushoverMessage<'a> {
    /// Application API token
    pub token: &'a str,
    /// Recipient key
    pub user: &'a str,
    /// Notification text
    pub message: String,
    /// Message priority
    pub priority: i8,
    /// Sound name
    pub sound: &'a str,
    /// Supplementary URL
    pub url: String,
    /// Title for the supplementary URL
    pub url_title: &'a str,
}

/// Pushover API client
#[derive(Debug, Clone)]
pub struct PushoverClient {
    client: Client,
    config: PushoverConfig,
}

impl PushoverClient {
    /// Create a new Pushover client with the given configuration
    pub fn new(config: PushoverConfig) -> NotifyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(NotifyError::Client)?;

        Ok(Self { client, config })
    }

    /// Returns the active configuration.
    pub const fn config(&self) -> &PushoverConfig {
        &self.config
    }

    /// Builds the request body for a hug request.
    pub fn build_message(&self, request: &HugRequest) -> PushoverMessage<'_> {
        let text = format!("A hug was requested from {}", request.requester_name);

        PushoverMessage {
            token: self.config.api_token.expose(),
            user: self.config.user_key.expose(),
            message: truncate_string(&text, MAX_MESSAGE_CHARS),
            priority: self.config.priority,
            sound: &self.config.sound,
            url: request.dm_link(),
            url_title: &self.config.url_title,
        }
    }
}

#[async_trait]
impl Notifier for PushoverClient {
    #[instrument(skip(self, request), fields(requester = %request.requester_name, requester_id = %request.requester_id))]
    async fn notify(&self, request: &HugRequest) -> NotifyResult<()> {
        let body = serde_json::to_vec(&self.build_message(request))?;
        debug!("Posting {} byte notification to {}", body.len(), self.config.api_url);

        let response = self
            .client
            .post(&self.config.api_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(NotifyError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
            });
        }

        info!("Hug request delivered to Pushover");
        Ok(())
    }
}
