//! Extraction adapter
//!
//! Calls the injected extraction capability and turns whatever text comes
//! back into candidate updates. Failures never escape: after the last
//! attempt the adapter reports "no updates".

use super::parse::{parse_candidates, ParseError};
use super::prompt::{build_request, ExtractionSettings};
use super::turn::TurnContext;
use crate::llm::{LlmError, LlmService};
use crate::questionnaire::{CandidateUpdate, QuestionnaireState};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

const PURPOSE: &str = "symptom_analysis";

/// Source of raw extraction text for one turn
#[async_trait]
pub trait ExtractionCapability: Send + Sync {
    /// Propose updates for `state` given this turn, as unparsed text
    async fn propose(&self, state: &QuestionnaireState, turn: &TurnContext)
        -> Result<String, LlmError>;

    /// Model behind the capability, for diagnostics
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: ExtractionCapability + ?Sized> ExtractionCapability for Arc<T> {
    async fn propose(
        &self,
        state: &QuestionnaireState,
        turn: &TurnContext,
    ) -> Result<String, LlmError> {
        (**self).propose(state, turn).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Extraction backed by a chat-completion model
pub struct LlmExtraction {
    llm: Arc<dyn LlmService>,
    settings: ExtractionSettings,
}

impl LlmExtraction {
    pub fn new(llm: Arc<dyn LlmService>, settings: ExtractionSettings) -> Self {
        Self { llm, settings }
    }
}

#[async_trait]
impl ExtractionCapability for LlmExtraction {
    async fn propose(
        &self,
        state: &QuestionnaireState,
        turn: &TurnContext,
    ) -> Result<String, LlmError> {
        let request = build_request(state, turn, self.settings);
        let response = self.llm.complete(&request).await?;
        Ok(response.text.trim().to_string())
    }

    fn model_id(&self) -> &str {
        self.llm.model_id()
    }
}

/// Why a single extraction attempt failed
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Extraction call failed: {0}")]
    Transport(#[from] LlmError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Runs the capability under a retry policy and parses its output
pub struct ExtractionAdapter {
    capability: Arc<dyn ExtractionCapability>,
    retry: RetryPolicy,
}

impl ExtractionAdapter {
    pub fn new(capability: Arc<dyn ExtractionCapability>, retry: RetryPolicy) -> Self {
        Self { capability, retry }
    }

    /// Candidate updates for this turn; empty when nothing was found or
    /// when every attempt failed. Callers cannot tell those apart.
    pub async fn extract(
        &self,
        state: &QuestionnaireState,
        turn: &TurnContext,
    ) -> Vec<CandidateUpdate> {
        tracing::info!(intent = %turn.intent, "Starting symptom extraction");

        let result = self
            .retry
            .run(PURPOSE, move |attempt| self.attempt(state, turn, attempt))
            .await;

        match result {
            Ok(updates) => {
                if updates.is_empty() {
                    tracing::info!("No symptom evidence in this turn");
                } else {
                    tracing::info!(count = updates.len(), "Symptom extraction complete");
                }
                updates
            }
            Err(exhausted) => {
                tracing::error!(
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "Symptom extraction failed, continuing without updates"
                );
                Vec::new()
            }
        }
    }

    async fn attempt(
        &self,
        state: &QuestionnaireState,
        turn: &TurnContext,
        attempt: u32,
    ) -> Result<Vec<CandidateUpdate>, ExtractionError> {
        tracing::info!(
            model = %self.capability.model_id(),
            purpose = PURPOSE,
            attempt,
            "LLM call"
        );
        let raw = self.capability.propose(state, turn).await?;
        tracing::debug!(raw = %raw, "Extraction output");
        Ok(parse_candidates(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dst::testing::{MockExtraction, MockLlm};
    use crate::dst::Intent;
    use crate::llm::LlmResponse;

    fn turn() -> TurnContext {
        TurnContext::new("요즘 기분은 어떠세요?", "계속 우울해요", Intent::AnswerSymptom)
    }

    fn adapter(mock: &Arc<MockExtraction>) -> ExtractionAdapter {
        ExtractionAdapter::new(mock.clone(), RetryPolicy::immediate(3))
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let mock = Arc::new(MockExtraction::new());
        mock.queue_text(r#"[{"questionId": "Q2", "status": "asking", "experience": "yes"}]"#);

        let updates = adapter(&mock).extract(&QuestionnaireState::new(), &turn()).await;
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].question_id, "Q2");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_parse_failure_is_retried() {
        let mock = Arc::new(MockExtraction::new());
        mock.queue_text("I could not find anything useful.");
        mock.queue_text(r#"{"questionId": "Q2", "status": "checking"}"#);

        let updates = adapter(&mock).extract(&QuestionnaireState::new(), &turn()).await;
        assert_eq!(updates.len(), 1);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_is_retried() {
        let mock = Arc::new(MockExtraction::new());
        mock.queue_error(LlmError::auth("bad key"));
        mock.queue_error(LlmError::network("reset"));
        mock.queue_text("[]");

        let updates = adapter(&mock).extract(&QuestionnaireState::new(), &turn()).await;
        assert!(updates.is_empty());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_degrades_to_empty() {
        let mock = Arc::new(MockExtraction::new());
        for _ in 0..3 {
            mock.queue_error(LlmError::server_error("down"));
        }
        mock.queue_text(r#"[{"questionId": "Q1"}]"#);

        let updates = adapter(&mock).extract(&QuestionnaireState::new(), &turn()).await;
        assert!(updates.is_empty());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_marker_is_not_retried() {
        let mock = Arc::new(MockExtraction::new());
        mock.queue_text("[]");

        let updates = adapter(&mock).extract(&QuestionnaireState::new(), &turn()).await;
        assert!(updates.is_empty());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_llm_extraction_sends_state_and_turn() {
        let llm = Arc::new(MockLlm::new("gpt-test"));
        llm.queue_response(LlmResponse::from_text("  []  "));

        let extraction = LlmExtraction::new(llm.clone(), ExtractionSettings::default());
        let raw = extraction
            .propose(&QuestionnaireState::new(), &turn())
            .await
            .unwrap();

        assert_eq!(raw, "[]");
        assert_eq!(extraction.model_id(), "gpt-test");
        let requests = llm.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system[0].text.contains("- Q2: "));
        assert!(requests[0].messages[0].text.contains("계속 우울해요"));
        assert_eq!(requests[0].temperature, Some(0.1));
    }
}
