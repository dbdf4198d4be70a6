//! Main entry point for HugBot.

use clap::Parser;
use hugbot::{BotResult, HugBot};
use hugbot_common::{init_logging, LogFormat};
use hugbot_config::ConfigLoader;
use std::path::PathBuf;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML); defaults to $HUGBOT_CONFIG
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overriding the configuration and RUST_LOG
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format: pretty, compact or json
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> BotResult<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::from_env();
    if let Some(path) = args.config {
        loader = loader.with_path(path);
    }
    let mut config = loader.load()?;

    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }
    init_logging(&config.logging)?;

    info!("Starting HugBot");

    let bot = HugBot::new(config);
    if let Err(e) = bot.start().await {
        error!("Bot failed: {}", e);
        return Err(e);
    }

    Ok(())
}
