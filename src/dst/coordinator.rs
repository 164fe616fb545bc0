//! Turn coordinator
//!
//! Sequences extraction and merge for one conversational turn. Whatever goes
//! wrong below this point, the caller gets a usable state back: a panic in
//! either stage turns the whole turn into a no-op.

use super::extraction::ExtractionAdapter;
use super::merge::merge;
use super::turn::{TurnContext, TurnOutcome};
use crate::questionnaire::QuestionnaireState;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

pub struct TurnCoordinator {
    adapter: ExtractionAdapter,
}

impl TurnCoordinator {
    pub fn new(adapter: ExtractionAdapter) -> Self {
        Self { adapter }
    }

    /// Run extraction and merge for this turn regardless of intent
    pub async fn run_turn(&self, prior: &QuestionnaireState, turn: &TurnContext) -> TurnOutcome {
        tracing::info!(intent = %turn.intent, "DST turn started");

        let extracted = AssertUnwindSafe(self.adapter.extract(prior, turn))
            .catch_unwind()
            .await;
        let Ok(updates) = extracted else {
            tracing::error!("Extraction panicked, leaving state unchanged");
            return TurnOutcome::unchanged(prior);
        };

        let merged = std::panic::catch_unwind(AssertUnwindSafe(|| merge(prior, &updates)));
        let Ok(result) = merged else {
            tracing::error!("Merge panicked, leaving state unchanged");
            return TurnOutcome::unchanged(prior);
        };

        tracing::info!(
            applied = result.applied.len(),
            last_answered = ?result.last_answered,
            answered = result.new_state.answered_count(),
            total = result.new_state.total_questions(),
            "DST turn finished"
        );
        tracing::debug!(state = ?result.new_state, "Merged questionnaire state");

        TurnOutcome {
            applied: result.applied,
            state: result.new_state,
            last_answered_question: result.last_answered,
            tracked: true,
        }
    }

    /// Track the turn only when the intent carries symptom evidence
    pub async fn track(&self, prior: &QuestionnaireState, turn: &TurnContext) -> TurnOutcome {
        if turn.intent.is_symptom() {
            self.run_turn(prior, turn).await
        } else {
            tracing::info!(intent = %turn.intent, "Non-symptom intent, skipping DST");
            TurnOutcome::skipped(prior)
        }
    }
}
