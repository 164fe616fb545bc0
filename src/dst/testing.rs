//! Mock implementations for testing
//!
//! These mocks let the tracker run end to end without a network.

use super::extraction::ExtractionCapability;
use super::turn::TurnContext;
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::questionnaire::QuestionnaireState;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock Extraction Capability
// ============================================================================

/// Scripted extraction capability that replays queued results
pub struct MockExtraction {
    results: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Number of calls made so far
    calls: Mutex<u32>,
    panic_on_call: bool,
}

impl MockExtraction {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(0),
            panic_on_call: false,
        }
    }

    /// A capability whose every call panics
    pub fn panicking() -> Self {
        Self {
            panic_on_call: true,
            ..Self::new()
        }
    }

    pub fn queue_text(&self, text: impl Into<String>) {
        self.results.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ExtractionCapability for MockExtraction {
    async fn propose(
        &self,
        _state: &QuestionnaireState,
        _turn: &TurnContext,
    ) -> Result<String, LlmError> {
        *self.calls.lock().unwrap() += 1;
        assert!(!self.panic_on_call, "extraction capability blew up");
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock result queued")))
    }

    fn model_id(&self) -> &str {
        "mock-extraction"
    }
}

// ============================================================================
// Mock LLM Service
// ============================================================================

/// Mock LLM service that returns queued responses
pub struct MockLlm {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlm {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
