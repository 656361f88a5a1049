//! Conversation state types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Greeting seeded into the conversation once the session is ready
pub const GREETING: &str =
    "Hello! I'm an assistant powered by Gemini. How can I help you today?";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One message in the conversation. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    id: String,
    speaker: Speaker,
    text: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            speaker,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }

    #[allow(dead_code)] // Part of the snapshot API
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered, append-only list of turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[allow(dead_code)] // Used by tests
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Lifecycle of the remote session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    InitFailed,
}

/// Everything the presentation layer reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatState {
    pub readiness: Readiness,
    /// Set while an exchange is in flight
    pub busy: bool,
    pub conversation: Conversation,
    /// Error panel text, if any
    pub banner: Option<String>,
}

impl ChatState {
    /// Whether a new message would be accepted right now
    pub fn accepts_input(&self) -> bool {
        self.readiness == Readiness::Ready && !self.busy
    }
}
