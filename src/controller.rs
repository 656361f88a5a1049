//! Conversation controller
//!
//! Owns the chat state and the session handle. Events go through the pure
//! [`transition`] function; the effects it returns are executed here and
//! their outcomes are fed back in as events. Observers receive a snapshot
//! after every accepted transition.

use crate::config::API_KEY_VAR;
use crate::error::ChatError;
use crate::llm::LlmErrorKind;
use crate::session::{Exchange, SessionConnector, SessionSettings};
use crate::state_machine::{transition, ChatState, Effect, Event, TransitionError};
use std::collections::VecDeque;
use tokio::sync::{watch, Mutex};

/// Controller for a single chat session
pub struct ChatController<C: SessionConnector> {
    settings: SessionSettings,
    connector: C,
    state: watch::Sender<ChatState>,
    session: Mutex<Option<C::Session>>,
}

impl<C: SessionConnector> ChatController<C> {
    pub fn new(settings: SessionSettings, connector: C) -> Self {
        let (state, _) = watch::channel(ChatState::default());
        Self {
            settings,
            connector,
            state,
            session: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Current state
    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    /// Start the session. Only the first call has any effect; later calls
    /// return [`TransitionError::AlreadyInitialized`].
    pub async fn initialize(&self) -> Result<(), TransitionError> {
        let effects = self.apply(Event::Startup)?;
        self.run_effects(effects).await;
        Ok(())
    }

    /// Send one user message and wait for the exchange to finish.
    ///
    /// Blank text, a session that is not ready, or an exchange already in
    /// flight reject the call without touching the conversation. Remote
    /// failures are recorded in the conversation and still return `Ok`.
    pub async fn send(&self, text: &str) -> Result<(), TransitionError> {
        let effects = self.apply(Event::UserMessage {
            text: text.to_string(),
        })?;
        self.run_effects(effects).await;
        Ok(())
    }

    /// Run one event through the state machine, publishing on success
    fn apply(&self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let name = event.name();
        let mut outcome = Ok(Vec::new());

        self.state
            .send_if_modified(|state| match transition(state, event) {
                Ok(result) => {
                    *state = result.new_state;
                    tracing::debug!(
                        event = name,
                        readiness = ?state.readiness,
                        busy = state.busy,
                        turns = state.conversation.len(),
                        "State transition"
                    );
                    outcome = Ok(result.effects);
                    true
                }
                Err(e) => {
                    tracing::debug!(event = name, error = %e, "Event rejected");
                    outcome = Err(e);
                    false
                }
            });

        outcome
    }

    async fn run_effects(&self, effects: Vec<Effect>) {
        let mut pending: VecDeque<Effect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            let event = self.execute_effect(effect).await;
            match self.apply(event) {
                Ok(more) => pending.extend(more),
                Err(e) => tracing::error!(error = %e, "Effect outcome rejected"),
            }
        }
    }

    async fn execute_effect(&self, effect: Effect) -> Event {
        match effect {
            Effect::CreateSession => self.create_session().await,
            Effect::RequestExchange { text } => self.request_exchange(&text).await,
        }
    }

    async fn create_session(&self) -> Event {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());

        let Some(api_key) = api_key else {
            tracing::error!(var = API_KEY_VAR, "API key is not configured");
            return Event::SessionFailed {
                error: ChatError::Config { var: API_KEY_VAR },
            };
        };

        match self.connector.connect(api_key, &self.settings) {
            Ok(session) => {
                *self.session.lock().await = Some(session);
                tracing::info!(model = %self.settings.model, "Session ready");
                Event::SessionCreated
            }
            Err(e) => {
                tracing::error!(model = %self.settings.model, error = %e, "Failed to create session");
                Event::SessionFailed {
                    error: ChatError::SessionInit(e.message),
                }
            }
        }
    }

    async fn request_exchange(&self, text: &str) -> Event {
        let mut session = self.session.lock().await;
        let Some(session) = session.as_mut() else {
            return Event::ExchangeFailed {
                error: ChatError::RemoteCall {
                    kind: LlmErrorKind::Unknown,
                    message: "Session is not available".to_string(),
                },
            };
        };

        match session.exchange(text).await {
            Ok(reply) => Event::ExchangeSucceeded { reply },
            Err(e) => {
                tracing::warn!(kind = e.kind.as_str(), error = %e, "Exchange failed");
                Event::ExchangeFailed { error: e.into() }
            }
        }
    }
}
