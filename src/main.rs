//! Startup Teardown Bot
//!
//! A Telegram bot that critiques startup ideas with an LLM and offers
//! follow-ups (a harsher roast, pivot suggestions, comparable companies)
//! on the last idea each user submitted.

mod config;
mod llm;
mod prompts;
mod runtime;
mod state_machine;
mod store;
mod transport;

use config::Config;
use llm::{AzureOpenAIService, LlmService, LoggingService};
use runtime::BotRuntime;
use std::sync::Arc;
use store::ConversationStore;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::TelegramTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teardown_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Panic");
    }));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(config = ?config, "Configuration loaded");

    let azure: Arc<dyn LlmService> = Arc::new(AzureOpenAIService::new(&config.azure)?);
    let llm = LoggingService::new(azure);
    let transport = Arc::new(TelegramTransport::new(&config.telegram)?);
    let store = Arc::new(ConversationStore::new());

    tracing::info!(model = %llm.model_id(), "LLM backend initialized");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            tracing::info!("Received Ctrl-C, shutting down");
            shutdown.cancel();
        }
    });

    tracing::info!("Bot is running with long polling");
    BotRuntime::new(store, llm, transport).run(shutdown).await;

    Ok(())
}
