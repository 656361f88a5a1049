//! Session handle for one remote conversational context
//!
//! A session is bound to one model and a fixed output limit, starts with an
//! empty history, and grows that history with every successful exchange.

#[cfg(test)]
pub mod testing;

use crate::llm::{GeminiService, LlmError, LlmMessage, LlmRequest, LlmService, LoggingService};
use async_trait::async_trait;
use std::sync::Arc;

/// Parameters fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub max_output_tokens: u32,
    pub base_url: String,
}

/// One round trip through a conversational context
#[async_trait]
pub trait Exchange: Send {
    /// Send `text` as the next user message and return the raw reply text
    async fn exchange(&mut self, text: &str) -> Result<String, LlmError>;
}

/// Builds session handles
pub trait SessionConnector: Send + Sync {
    type Session: Exchange + 'static;

    /// Construct a session. `api_key` has already been checked for presence.
    fn connect(&self, api_key: &str, settings: &SessionSettings) -> Result<Self::Session, LlmError>;
}

/// Session backed by an [`LlmService`], carrying the history itself
pub struct ChatSession {
    service: Arc<dyn LlmService>,
    history: Vec<LlmMessage>,
    max_output_tokens: u32,
}

impl ChatSession {
    pub fn new(service: Arc<dyn LlmService>, max_output_tokens: u32) -> Self {
        Self {
            service,
            history: Vec::new(),
            max_output_tokens,
        }
    }

    #[allow(dead_code)] // Inspected in tests
    pub fn model_id(&self) -> &str {
        self.service.model_id()
    }

    #[allow(dead_code)] // Inspected in tests
    pub fn history(&self) -> &[LlmMessage] {
        &self.history
    }
}

#[async_trait]
impl Exchange for ChatSession {
    async fn exchange(&mut self, text: &str) -> Result<String, LlmError> {
        let user = LlmMessage::user(text);
        let mut messages = self.history.clone();
        messages.push(user.clone());

        let request = LlmRequest {
            messages,
            max_tokens: Some(self.max_output_tokens),
        };
        let response = self.service.complete(&request).await?;

        // Gemini rejects empty model turns, so a blank reply is not recorded
        if !response.text.trim().is_empty() {
            self.history.push(user);
            self.history.push(LlmMessage::assistant(response.text.clone()));
        }

        Ok(response.text)
    }
}

/// Production connector: a logged [`GeminiService`] per session
#[derive(Debug, Default, Clone, Copy)]
pub struct GeminiConnector;

impl SessionConnector for GeminiConnector {
    type Session = ChatSession;

    fn connect(&self, api_key: &str, settings: &SessionSettings) -> Result<ChatSession, LlmError> {
        let service = GeminiService::new(api_key.to_string(), &settings.model, &settings.base_url)?;
        let service: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(service)));

        tracing::info!(
            model = %settings.model,
            max_output_tokens = settings.max_output_tokens,
            "Chat session created"
        );
        Ok(ChatSession::new(service, settings.max_output_tokens))
    }
}
