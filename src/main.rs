//! Socavón bot - Telegram assistant for sinkhole hazards in CDMX
//!
//! Offers a risk quiz, emergency numbers, hazard guidance and a report
//! intake flow through a fixed reply keyboard.

mod config;
mod content;
mod poller;
mod risk;
mod runtime;
mod state_machine;
mod telegram;

use config::BotConfig;
use poller::Poller;
use runtime::RuntimeManager;
use std::process::ExitCode;
use std::sync::Arc;
use telegram::TelegramClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "socavon_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration. Set {} to the bot token.", config::TOKEN_VAR);
            return ExitCode::FAILURE;
        }
    };

    let client = match TelegramClient::new(&config.api_url, &config.token, config.poll_timeout) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build Telegram client");
            return ExitCode::FAILURE;
        }
    };

    // Verify the token before listening
    let me = match client.get_me().await {
        Ok(me) => me,
        Err(e) => {
            tracing::error!(error = %e, kind = ?e.kind, "Failed to reach the Bot API");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        bot_id = me.id,
        username = me.username.as_deref().unwrap_or("-"),
        api_url = %config.api_url,
        poll_timeout_secs = config.poll_timeout.as_secs(),
        session_idle_secs = config.session_idle.as_secs(),
        "Bot authenticated"
    );

    let manager = Arc::new(RuntimeManager::new(client.clone(), config.session_idle));
    let poller = Poller::new(client, manager.clone(), me.username, config.poll_timeout);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                signal_token.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Unable to listen for shutdown signal"),
        }
    });

    tracing::info!("Listening for messages");
    let result = poller.run(shutdown).await;

    tracing::info!(active_chats = manager.active_count().await, "Bot stopped");
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
