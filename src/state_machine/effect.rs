//! Effects produced by state transitions

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Validate the credential and build the session handle
    CreateSession,

    /// Send one message through the session handle
    RequestExchange { text: String },
}

impl Effect {
    pub fn request_exchange(text: impl Into<String>) -> Self {
        Effect::RequestExchange { text: text.into() }
    }
}
