//! Core bot logic using the Poise framework.

use crate::error::{BotError, BotResult};
use hugbot_commands::{create_framework, CooldownGate, Data, RequestHandler};
use hugbot_common::{PushoverClient, UserId};
use hugbot_config::Config;
use poise::serenity_prelude as serenity;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

/// Gateway intents the bot subscribes to.
///
/// DM content is delivered without the privileged message-content intent.
pub const fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::DIRECT_MESSAGES
}

/// Builds the DM handler with a fresh cooldown gate and a Pushover notifier.
pub fn build_handler(config: &Config, bot_id: UserId) -> BotResult<RequestHandler> {
    let notifier = PushoverClient::new(config.pushover.clone())?;
    let gate = CooldownGate::from_hours(config.requests.cooldown_hours);

    Ok(RequestHandler::new(
        bot_id,
        Arc::new(gate),
        Arc::new(notifier),
        config.requests.clone(),
    ))
}

/// Main bot structure.
pub struct HugBot {
    config: Arc<Config>,
}

impl HugBot {
    /// Creates a new bot instance.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Runs the bot until SIGINT or SIGTERM.
    pub async fn start(&self) -> BotResult<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Runs the bot until `shutdown` completes, then closes all shards.
    pub async fn run_until<F>(&self, shutdown: F) -> BotResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.config.discord.token.expose();

        let http = serenity::Http::new(token);
        let me = http.get_current_user().await.map_err(BotError::Identity)?;
        info!("Authenticated as {} ({})", me.name, me.id);

        let handler = build_handler(&self.config, UserId(me.id.get()))?;
        let framework = create_framework(Data {
            handler: Arc::new(handler),
            status_text: self.config.discord.status_text.clone(),
        });

        let mut client = serenity::ClientBuilder::new(token, intents())
            .framework(framework)
            .await?;

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            shutdown.await;
            info!("Received shutdown signal, closing Discord session");
            shard_manager.shutdown_all().await;
        });

        info!("Bot opened!");
        client.start().await?;
        info!("Bot closed!");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or on SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
