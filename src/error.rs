//! Errors surfaced to the user by the chat controller

use crate::llm::{LlmError, LlmErrorKind};
use thiserror::Error;

/// Failures that end up in the conversation or the error banner.
///
/// `Config` and `SessionInit` are fatal to initialization. `EmptyResponse`
/// and `RemoteCall` are recovered per send.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("API key is not configured. Set {var} and restart.")]
    Config { var: &'static str },

    #[error("Failed to initialize chat session: {0}")]
    SessionInit(String),

    #[error("The model returned an empty response")]
    EmptyResponse,

    #[error("{message}")]
    RemoteCall { kind: LlmErrorKind, message: String },
}

impl ChatError {
    /// What the user can do about a failed send, based on the error kind
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RemoteCall { kind, .. } if kind.is_retryable() => {
                Some("This is usually temporary; send the message again.")
            }
            Self::RemoteCall {
                kind: LlmErrorKind::Auth,
                ..
            } => Some("Check that the API key is valid."),
            Self::EmptyResponse => Some("Try rephrasing the message."),
            _ => None,
        }
    }
}

impl From<LlmError> for ChatError {
    fn from(e: LlmError) -> Self {
        Self::RemoteCall {
            kind: e.kind,
            message: e.message,
        }
    }
}
