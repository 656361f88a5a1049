//! Events that can occur in a conversation

use crate::error::ChatError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Lifecycle events
    Startup,
    SessionCreated,
    SessionFailed { error: ChatError },

    // User events
    UserMessage { text: String },

    // Exchange events
    ExchangeSucceeded { reply: String },
    ExchangeFailed { error: ChatError },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Startup => "startup",
            Event::SessionCreated => "session_created",
            Event::SessionFailed { .. } => "session_failed",
            Event::UserMessage { .. } => "user_message",
            Event::ExchangeSucceeded { .. } => "exchange_succeeded",
            Event::ExchangeFailed { .. } => "exchange_failed",
        }
    }
}
