//! Pure state transition function
//!
//! Session lifecycle: `Uninitialized -> Initializing -> Ready | InitFailed`.
//! While `Ready`, a user message sets the busy flag until the exchange it
//! started completes. Every exchange outcome leaves a visible assistant turn.

use super::state::{ChatState, Readiness, Turn, GREETING};
use super::{Effect, Event};
use crate::error::ChatError;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition. A rejected event leaves the
/// state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Session already started")]
    AlreadyInitialized,
    #[error("Session is not ready")]
    NotReady,
    #[error("Waiting for a response, cannot accept message")]
    Busy,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Text of the assistant turn recorded when a send fails
pub fn apology_text(error: &ChatError) -> String {
    format!("Sorry, I encountered an error while answering: {error}")
}

/// Banner text recorded when a send fails
pub fn failure_banner(error: &ChatError) -> String {
    match error.hint() {
        Some(hint) => format!("Failed to get a response: {error}. {hint}"),
        None => format!("Failed to get a response: {error}"),
    }
}

/// Pure transition function
///
/// Given the same inputs it produces the same state shape and effects;
/// the only nondeterminism is the id and timestamp of new turns.
pub fn transition(state: &ChatState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state.readiness, event) {
        // ============================================================
        // Session lifecycle
        // ============================================================
        (Readiness::Uninitialized, Event::Startup) => {
            let next = ChatState {
                readiness: Readiness::Initializing,
                ..state.clone()
            };
            Ok(TransitionResult::new(next).with_effect(Effect::CreateSession))
        }

        (_, Event::Startup) => Err(TransitionError::AlreadyInitialized),

        (Readiness::Initializing, Event::SessionCreated) => {
            let mut next = ChatState {
                readiness: Readiness::Ready,
                banner: None,
                ..state.clone()
            };
            next.conversation.push(Turn::assistant(GREETING));
            Ok(TransitionResult::new(next))
        }

        (Readiness::Initializing, Event::SessionFailed { error }) => {
            let next = ChatState {
                readiness: Readiness::InitFailed,
                banner: Some(error.to_string()),
                ..state.clone()
            };
            Ok(TransitionResult::new(next))
        }

        (readiness, event @ (Event::SessionCreated | Event::SessionFailed { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "{} while {readiness:?}",
                event.name()
            )))
        }

        // ============================================================
        // User messages
        // ============================================================
        (readiness, Event::UserMessage { text }) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyMessage);
            }
            if readiness != Readiness::Ready {
                return Err(TransitionError::NotReady);
            }
            if state.busy {
                return Err(TransitionError::Busy);
            }

            let mut next = ChatState {
                busy: true,
                banner: None,
                ..state.clone()
            };
            next.conversation.push(Turn::user(text));
            Ok(TransitionResult::new(next).with_effect(Effect::request_exchange(text)))
        }

        // ============================================================
        // Exchange completion
        // ============================================================
        (Readiness::Ready, Event::ExchangeSucceeded { reply }) if state.busy => {
            let reply = reply.trim();
            if reply.is_empty() {
                return Ok(TransitionResult::new(fail_exchange(state, &ChatError::EmptyResponse)));
            }

            let mut next = ChatState {
                busy: false,
                ..state.clone()
            };
            next.conversation.push(Turn::assistant(reply));
            Ok(TransitionResult::new(next))
        }

        (Readiness::Ready, Event::ExchangeFailed { error }) if state.busy => {
            Ok(TransitionResult::new(fail_exchange(state, &error)))
        }

        (readiness, event @ (Event::ExchangeSucceeded { .. } | Event::ExchangeFailed { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "{} while {readiness:?} (busy: {})",
                event.name(),
                state.busy
            )))
        }
    }
}

fn fail_exchange(state: &ChatState, error: &ChatError) -> ChatState {
    let mut next = ChatState {
        busy: false,
        banner: Some(failure_banner(error)),
        ..state.clone()
    };
    next.conversation.push(Turn::assistant(apology_text(error)));
    next
}
