//! Poise framework setup and Discord event dispatch.

use crate::handler::{InboundMessage, RequestHandler};
use hugbot_common::{ChannelId, UserId};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Application data accessible in all event handlers.
pub struct Data {
    /// Decides how to answer incoming DMs.
    pub handler: Arc<RequestHandler>,
    /// "Playing" status set whenever the gateway reports Ready.
    pub status_text: String,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("handler", &self.handler)
            .field("status_text", &self.status_text)
            .finish()
    }
}

/// Application error type for event handlers.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Creates the Poise framework that routes DMs into `data.handler`.
pub fn create_framework(data: Data) -> poise::Framework<Data, Error> {
    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![],
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: None,
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |_ctx, ready, _framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);
                Ok(data)
            })
        })
        .build()
}

/// Converts a Discord message into the handler's transport-free form.
pub fn inbound_from(message: &serenity::Message) -> InboundMessage {
    InboundMessage {
        author_id: UserId(message.author.id.get()),
        author_name: message.author.name.clone(),
        channel_id: ChannelId(message.channel_id.get()),
        content: message.content.clone(),
    }
}

/// Central event handler for Discord events
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Bot ready event received for: {}", data_about_bot.user.name);
            ctx.set_activity(Some(serenity::ActivityData::playing(&data.status_text)));
        }
        serenity::FullEvent::Message { new_message } => {
            handle_message(ctx, new_message, data).await;
        }
        _ => {}
    }
    Ok(())
}

async fn handle_message(ctx: &serenity::Context, message: &serenity::Message, data: &Data) {
    let inbound = inbound_from(message);
    let Some(text) = data.handler.respond(&inbound).await else {
        return;
    };

    if let Err(e) = message.reply(ctx, text).await {
        warn!(
            "Failed to reply to {} in channel {}: {}",
            inbound.author_name, inbound.channel_id, e
        );
    }
}

/// Global error handler for the framework
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error in event handler for {:?}: {:?}", event.snake_case_name(), error);
        }
        error => {
            error!("Other error: {}", error);
        }
    }
}
