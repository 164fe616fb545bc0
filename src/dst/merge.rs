//! Pure state merge
//!
//! Given the previous canonical state and the candidate updates extracted
//! this turn, produce the next canonical state. Same inputs always give the
//! same output, and nothing here performs I/O.

use crate::questionnaire::{CandidateUpdate, QuestionId, QuestionnaireItem, QuestionnaireState};

/// Result of merging one turn's updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub new_state: QuestionnaireState,
    pub last_answered: Option<QuestionId>,
    /// Updates that matched a known item, in input order
    pub applied: Vec<CandidateUpdate>,
    /// Raw ids of updates that matched nothing
    pub skipped: Vec<String>,
}

/// Apply `updates` on top of `prior`.
///
/// Every item's `updated` flag is cleared first, then set again for each item
/// an update lands on. Updates naming an id outside Q1..Q10 are skipped. When
/// several updates flag themselves as answered, the last one wins.
pub fn merge(prior: &QuestionnaireState, updates: &[CandidateUpdate]) -> MergeResult {
    let mut new_state = prior.clone();
    for item in new_state.questions.iter_mut() {
        item.updated = false;
    }

    let mut last_answered = None;
    let mut applied = Vec::with_capacity(updates.len());
    let mut skipped = Vec::new();

    for update in updates {
        let id = match update.target() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping update for unknown question");
                skipped.push(update.question_id.clone());
                continue;
            }
        };

        apply_update(new_state.item_mut(id), update);
        if update.flags_answered() {
            last_answered = Some(id);
        }
        applied.push(update.clone());
    }

    new_state.last_answered_question = last_answered;

    tracing::info!(
        applied = applied.len(),
        skipped = skipped.len(),
        last_answered = ?last_answered,
        answered = new_state.answered_count(),
        "Merged questionnaire state"
    );

    MergeResult {
        new_state,
        last_answered,
        applied,
        skipped,
    }
}

/// Overwrite every field the update carries. Identity never changes.
fn apply_update(item: &mut QuestionnaireItem, update: &CandidateUpdate) {
    if let Some(text) = &update.question_text {
        item.question_text.clone_from(text);
    }
    if let Some(experience) = update.experience {
        item.experience = experience;
    }
    if let Some(status) = update.status {
        item.status = status;
    }
    if let Some(inputs) = &update.raw_user_input {
        item.record_utterances(inputs);
    }
    if let Some(frequency) = &update.frequency {
        item.frequency.clone_from(frequency);
    }
    if let Some(condition) = &update.condition {
        item.condition.clone_from(condition);
    }
    if let Some(note) = &update.note {
        item.note.clone_from(note);
    }
    if let Some(conflict) = &update.conflict {
        item.conflict.clone_from(conflict);
    }
    item.updated = true;
}
