//! Mock implementations for testing
//!
//! These mocks enable controller and session tests without real I/O.

use super::{ChatSession, SessionConnector, SessionSettings};
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Mock LLM Service
// ============================================================================

/// Mock LLM service that returns queued responses
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a reply consisting of plain text
    pub fn queue_text(&self, text: &str) {
        self.queue_response(LlmResponse::from_text(text));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<LlmResponse, LlmError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Gated Mock LLM Service (for in-flight observation)
// ============================================================================

/// Mock LLM service that holds every request until released
pub struct GatedMockLlmService {
    inner: MockLlmService,
    /// Notified when a request starts
    pub request_started: Arc<Notify>,
    /// Notify once to let one pending request finish
    pub release: Arc<Notify>,
}

impl GatedMockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            inner: MockLlmService::new(model_id),
            request_started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    pub fn queue_text(&self, text: &str) {
        self.inner.queue_text(text);
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl LlmService for GatedMockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        self.request_started.notify_one();
        self.release.notified().await;
        self.inner.next_response()
    }

    fn model_id(&self) -> &str {
        &self.inner.model_id
    }
}

// ============================================================================
// Mock Connector
// ============================================================================

/// Connector that builds sessions over a shared mock service
pub struct MockConnector {
    llm: Arc<dyn LlmService>,
    failure: Option<LlmError>,
    connects: AtomicUsize,
}

impl MockConnector {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self {
            llm,
            failure: None,
            connects: AtomicUsize::new(0),
        }
    }

    /// Make every `connect` fail with `error`
    pub fn failing(llm: Arc<dyn LlmService>, error: LlmError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(llm)
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl SessionConnector for MockConnector {
    type Session = ChatSession;

    fn connect(&self, _api_key: &str, settings: &SessionSettings) -> Result<ChatSession, LlmError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(ChatSession::new(self.llm.clone(), settings.max_output_tokens))
    }
}

/// Settings with a credential present
pub fn test_settings() -> SessionSettings {
    SessionSettings {
        api_key: Some("test-key".to_string()),
        model: "mock-model".to_string(),
        max_output_tokens: 1000,
        base_url: "http://127.0.0.1:1".to_string(),
    }
}
