mod check_cmd;
mod doctor_cmd;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use imeibot_channels::{ChannelAdapter, ImeiConversation, TelegramAdapter};
use imeibot_config::BotConfig;
use imeibot_core::{InMemorySessionStore, Mode};
use imeibot_logging::{init_logger, LoggerGuard};
use imeibot_relay::ImeiRelay;

#[derive(Parser)]
#[command(name = "imei-bot")]
#[command(about = "Telegram bot that relays IMEI checks to a remote API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot (default)
    Run,
    /// Run a single IMEI check and print the API response
    Check {
        /// Which endpoint to call
        #[arg(short, long, default_value = "sandbox")]
        mode: Mode,
        /// IMEI to check (may be empty)
        imei: String,
    },
    /// Validate configuration and print a redacted snapshot
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: failed to read .env: {e}");
        }
    }

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let (config, _guard) = load()?;
            run_bot(config).await
        }
        Commands::Check { mode, imei } => {
            let (config, _guard) = load()?;
            check_cmd::run(&config, mode, &imei).await
        }
        Commands::Doctor => {
            let _guard = init_logger("warn", None);
            doctor_cmd::run()
        }
    }
}

/// Load config, start logging, then validate. Any config error is fatal.
fn load() -> Result<(BotConfig, LoggerGuard)> {
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _guard = init_logger("info", None);
            tracing::error!(error = %e, "Refusing to start");
            return Err(e).context("invalid configuration");
        }
    };
    let guard = init_logger(&config.log_level, config.log_dir.as_deref());
    info!(config = %config.redacted(), "Configuration loaded");

    if let Err(e) = imeibot_config::check(&config) {
        tracing::error!(error = %e, "Refusing to start");
        return Err(e).context("invalid configuration");
    }
    Ok((config, guard))
}

async fn run_bot(config: BotConfig) -> Result<()> {
    if config.test_mode {
        warn!("Running in test mode");
    }

    let relay = ImeiRelay::new(&config.api, config.test_mode)?;
    info!(
        live = %relay.endpoint(Mode::Live),
        sandbox = %relay.endpoint(Mode::Sandbox),
        timeout_secs = relay.timeout().as_secs(),
        "IMEI relay ready"
    );

    let conversation = Arc::new(ImeiConversation::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(relay),
    ));
    let adapter = TelegramAdapter::new(config.bot_token.clone(), conversation);

    info!(adapter = adapter.name(), "Starting bot");
    adapter.start().await
}
