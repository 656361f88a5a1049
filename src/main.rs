//! Gemini Chat - terminal chat client for the Gemini API
//!
//! A conversation controller with a pure state machine, a single remote
//! session, and a ratatui front end.

mod config;
mod controller;
mod error;
mod llm;
mod session;
mod state_machine;
mod tui;

use config::ChatConfig;
use controller::ChatController;
use session::GeminiConnector;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChatConfig::from_env();

    // The terminal belongs to the UI, so logs go to a file
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    tracing::info!(
        model = %config.model,
        max_output_tokens = config.max_output_tokens,
        base_url = %config.base_url,
        api_key_present = config.api_key.is_some(),
        "Starting gemini-chat"
    );

    let controller = Arc::new(ChatController::new(
        config.session_settings(),
        GeminiConnector,
    ));
    tui::run(controller).await?;

    tracing::info!("Exiting");
    Ok(())
}
