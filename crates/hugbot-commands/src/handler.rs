//! Decides how to answer a direct message.
//!
//! The handler never talks to Discord itself: it takes an [`InboundMessage`],
//! consults the [`CooldownGate`], dispatches through a [`Notifier`] and
//! returns the [`Reply`] the transport should send back.

use crate::cooldown::CooldownGate;
use chrono::{DateTime, Utc};
use hugbot_common::{format_remaining, ChannelId, HugRequest, Notifier, UserId};
use hugbot_config::RequestsConfig;
use std::sync::Arc;
use tracing::{debug, error, info};

/// A direct message received by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Author's user ID
    pub author_id: UserId,
    /// Author's username
    pub author_name: String,
    /// DM channel the message arrived in
    pub channel_id: ChannelId,
    /// Raw message content
    pub content: String,
}

/// The answer to send as a threaded reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The request passed the gate and was dispatched.
    Confirmation,
    /// The user asked again inside their cooldown window.
    Cooldown,
    /// The message was not the trigger keyword.
    Usage,
}

/// Handles hug requests arriving by direct message.
pub struct RequestHandler {
    bot_id: UserId,
    gate: Arc<CooldownGate>,
    notifier: Arc<dyn Notifier>,
    settings: RequestsConfig,
}

impl RequestHandler {
    /// Creates a handler for the bot with the given user ID.
    pub fn new(
        bot_id: UserId,
        gate: Arc<CooldownGate>,
        notifier: Arc<dyn Notifier>,
        settings: RequestsConfig,
    ) -> Self {
        Self {
            bot_id,
            gate,
            notifier,
            settings,
        }
    }

    /// The bot's own user ID.
    pub const fn bot_id(&self) -> UserId {
        self.bot_id
    }

    /// The shared cooldown gate.
    pub fn gate(&self) -> &Arc<CooldownGate> {
        &self.gate
    }

    /// Handles a message received now.
    pub async fn handle(&self, message: &InboundMessage) -> Option<Reply> {
        self.handle_at(message, Utc::now()).await
    }

    /// Handles a message as if it were received at `now`.
    ///
    /// Returns `None` for the bot's own messages. A failed dispatch is logged
    /// and still answered with [`Reply::Confirmation`]; the cooldown stays
    /// recorded either way.
    pub async fn handle_at(&self, message: &InboundMessage, now: DateTime<Utc>) -> Option<Reply> {
        if message.author_id == self.bot_id {
            return None;
        }

        if message.content != self.settings.trigger {
            return Some(Reply::Usage);
        }

        if !self.gate.try_consume_at(message.author_id, now) {
            let remaining = self
                .gate
                .remaining(message.author_id, now)
                .map_or_else(|| "0h00m".to_string(), format_remaining);
            info!(
                "Denied hug request from {} ({}), {} left",
                message.author_name, message.author_id, remaining
            );
            return Some(Reply::Cooldown);
        }

        info!("Hug request from {} ({})", message.author_name, message.author_id);
        let request = HugRequest::new(message.author_id, message.author_name.clone());
        if let Err(e) = self.notifier.notify(&request).await {
            error!("Failed to dispatch hug request from {}: {}", message.author_name, e);
        }

        Some(Reply::Confirmation)
    }

    /// Text to send for a reply.
    pub fn reply_text(&self, reply: Reply) -> &str {
        match reply {
            Reply::Confirmation => &self.settings.confirmation_text,
            Reply::Cooldown => &self.settings.cooldown_text,
            Reply::Usage => &self.settings.usage_text,
        }
    }

    /// Handles a message and returns the text to send, if any.
    pub async fn respond(&self, message: &InboundMessage) -> Option<&str> {
        let reply = self.handle(message).await?;
        if reply == Reply::Usage {
            debug!(
                "Unrecognised DM from {} in channel {}",
                message.author_name, message.channel_id
            );
        }
        Some(self.reply_text(reply))
    }
}

impl std::fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandler")
            .field("bot_id", &self.bot_id)
            .field("gate", &self.gate)
            .field("notifier", &"<dyn Notifier>")
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use hugbot_common::test_utils::property_testing::{user_id_strategy, username_strategy};
    use hugbot_common::test_utils::{discord_fixtures, mock_timestamp};
    use hugbot_common::{MockNotifier, NotifyError};
    use proptest::prelude::*;

    fn message(author: UserId, content: &str) -> InboundMessage {
        InboundMessage {
            author_id: author,
            author_name: "alice".to_string(),
            channel_id: discord_fixtures::test_channel_id(),
            content: content.to_string(),
        }
    }

    fn handler(notifier: MockNotifier) -> RequestHandler {
        RequestHandler::new(
            discord_fixtures::bot_user_id(),
            Arc::new(CooldownGate::default()),
            Arc::new(notifier),
            RequestsConfig::default(),
        )
    }

    #[tokio::test]
    async fn trigger_dispatches_and_confirms() {
        let user = discord_fixtures::test_user_id();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |request| {
                request.requester_id == user && request.requester_name == "alice"
            })
            .times(1)
            .returning(|_| Ok(()));

        let handler = handler(notifier);
        let reply = handler.handle(&message(user, "hug")).await;

        assert_eq!(reply, Some(Reply::Confirmation));
        assert_eq!(
            handler.reply_text(Reply::Confirmation),
            "Your hug request has been sent!"
        );
        assert!(handler.gate().last_request(user).is_some());
    }

    #[tokio::test]
    async fn second_request_inside_window_is_denied_without_dispatch() {
        let user = discord_fixtures::test_user_id();
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(1).returning(|_| Ok(()));

        let handler = handler(notifier);
        let t1 = mock_timestamp(2024, 5, 1, 8, 0, 0);

        assert_eq!(
            handler.handle_at(&message(user, "hug"), t1).await,
            Some(Reply::Confirmation)
        );
        assert_eq!(
            handler
                .handle_at(&message(user, "hug"), t1 + Duration::minutes(1))
                .await,
            Some(Reply::Cooldown)
        );
        assert_eq!(handler.gate().last_request(user), Some(t1));
    }

    #[tokio::test]
    async fn other_content_gets_usage_without_gate() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let handler = handler(notifier);
        let user = discord_fixtures::test_user_id();

        for content in ["hello", "Hug", " hug", "hug ", "HUG", ""] {
            assert_eq!(handler.handle(&message(user, content)).await, Some(Reply::Usage));
        }
        assert!(handler.gate().is_empty());
    }

    #[tokio::test]
    async fn own_messages_are_ignored() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let handler = handler(notifier);
        let own = message(discord_fixtures::bot_user_id(), "hug");

        assert_eq!(handler.handle(&own).await, None);
        assert_eq!(handler.respond(&own).await, None);
        assert!(handler.gate().is_empty());
    }

    #[tokio::test]
    async fn dispatch_failure_still_confirms_and_keeps_cooldown() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_| Err(NotifyError::Status { status: 500 }));

        let handler = handler(notifier);
        let user = discord_fixtures::test_user_id();

        assert_eq!(
            handler.respond(&message(user, "hug")).await,
            Some("Your hug request has been sent!")
        );
        assert_eq!(handler.handle(&message(user, "hug")).await, Some(Reply::Cooldown));
    }

    #[tokio::test]
    async fn custom_trigger_and_texts_are_used() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(1).returning(|_| Ok(()));

        let settings = RequestsConfig {
            trigger: "cuddle".to_string(),
            usage_text: "say cuddle".to_string(),
            ..RequestsConfig::default()
        };
        let handler = RequestHandler::new(
            discord_fixtures::bot_user_id(),
            Arc::new(CooldownGate::default()),
            Arc::new(notifier),
            settings,
        );
        let user = discord_fixtures::test_user_id();

        assert_eq!(handler.respond(&message(user, "hug")).await, Some("say cuddle"));
        assert_eq!(
            handler.handle(&message(user, "cuddle")).await,
            Some(Reply::Confirmation)
        );
    }

    proptest! {
        #[test]
        fn first_trigger_dispatches_requester_name(
            user in user_id_strategy(),
            name in username_strategy(),
        ) {
            prop_assume!(user != discord_fixtures::bot_user_id());
            let expected = name.clone();
            let mut notifier = MockNotifier::new();
            notifier
                .expect_notify()
                .withf(move |request| {
                    request.requester_id == user && request.requester_name == expected
                })
                .times(1)
                .returning(|_| Ok(()));

            let handler = handler(notifier);
            let inbound = InboundMessage {
                author_id: user,
                author_name: name,
                channel_id: discord_fixtures::test_channel_id(),
                content: "hug".to_string(),
            };

            let runtime = tokio::runtime::Runtime::new().unwrap();
            let reply = runtime.block_on(handler.handle(&inbound));
            prop_assert_eq!(reply, Some(Reply::Confirmation));
        }
    }
}
