//! Per-turn inputs and outputs of the tracker

use super::intent::Intent;
use crate::questionnaire::{CandidateUpdate, QuestionId, QuestionnaireState};
use serde::{Deserialize, Serialize};

/// What happened in the conversation this turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    /// The agent utterance the user is replying to
    #[serde(default)]
    pub last_bot_message: String,
    #[serde(rename = "message")]
    pub user_message: String,
    pub intent: Intent,
}

impl TurnContext {
    pub fn new(
        last_bot_message: impl Into<String>,
        user_message: impl Into<String>,
        intent: impl Into<Intent>,
    ) -> Self {
        Self {
            last_bot_message: last_bot_message.into(),
            user_message: user_message.into(),
            intent: intent.into(),
        }
    }
}

/// Result of one tracked turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    /// Updates that landed on a known item, in application order
    #[serde(rename = "updated_slots")]
    pub applied: Vec<CandidateUpdate>,
    #[serde(rename = "status")]
    pub state: QuestionnaireState,
    pub last_answered_question: Option<QuestionId>,
    /// False when the turn never reached extraction (non-symptom intent)
    pub tracked: bool,
}

impl TurnOutcome {
    /// The turn changed nothing: prior state comes back as-is
    pub fn unchanged(prior: &QuestionnaireState) -> Self {
        Self {
            applied: Vec::new(),
            state: prior.clone(),
            last_answered_question: None,
            tracked: true,
        }
    }

    /// Tracking was not attempted; the previous answered marker stands
    pub fn skipped(prior: &QuestionnaireState) -> Self {
        Self {
            last_answered_question: prior.last_answered_question,
            tracked: false,
            ..Self::unchanged(prior)
        }
    }
}
