//! Canonical questionnaire state for one session

use super::item::{QuestionId, QuestionnaireItem};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

/// Errors building a questionnaire container from untrusted input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Expected {expected} questions, got {actual}")]
    WrongCardinality { expected: usize, actual: usize },
    #[error("Question {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

/// The ten items, stored at the index of their [`QuestionId`].
///
/// On the wire this is an ordered JSON array. Any array that does not contain
/// each of Q1..Q10 exactly once is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<QuestionnaireItem>", into = "Vec<QuestionnaireItem>")]
pub struct Questions([QuestionnaireItem; QuestionId::COUNT]);

impl Questions {
    pub fn get(&self, id: QuestionId) -> &QuestionnaireItem {
        &self.0[id.index()]
    }

    pub fn get_mut(&mut self, id: QuestionId) -> &mut QuestionnaireItem {
        &mut self.0[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionnaireItem> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut QuestionnaireItem> {
        self.0.iter_mut()
    }
}

impl Default for Questions {
    fn default() -> Self {
        Self(QuestionId::ALL.map(QuestionnaireItem::new))
    }
}

impl TryFrom<Vec<QuestionnaireItem>> for Questions {
    type Error = StateError;

    fn try_from(items: Vec<QuestionnaireItem>) -> Result<Self, Self::Error> {
        if items.len() != QuestionId::COUNT {
            return Err(StateError::WrongCardinality {
                expected: QuestionId::COUNT,
                actual: items.len(),
            });
        }

        let mut slots: [Option<QuestionnaireItem>; QuestionId::COUNT] = Default::default();
        for item in items {
            let slot = &mut slots[item.question_id.index()];
            if slot.is_some() {
                return Err(StateError::DuplicateQuestion(item.question_id));
            }
            *slot = Some(item);
        }

        // Ten items with no duplicates fill every slot
        let mut filled = Questions::default();
        for (target, slot) in filled.0.iter_mut().zip(slots) {
            if let Some(item) = slot {
                *target = item;
            }
        }
        Ok(filled)
    }
}

impl From<Questions> for Vec<QuestionnaireItem> {
    fn from(questions: Questions) -> Self {
        questions.0.into()
    }
}

/// Full canonical record of one screening session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestionnaireState {
    pub questions: Questions,
    /// Item most recently flagged as answered in the latest turn with updates
    #[serde(default)]
    pub last_answered_question: Option<QuestionId>,
    /// Owned by policy selection; carried through untouched
    #[serde(default)]
    pub last_asked_question: Option<QuestionId>,
    #[serde(default)]
    pub is_completed: bool,
}

impl QuestionnaireState {
    /// Fresh session with every item unanswered
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: QuestionId) -> &QuestionnaireItem {
        self.questions.get(id)
    }

    pub fn item_mut(&mut self, id: QuestionId) -> &mut QuestionnaireItem {
        self.questions.get_mut(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &QuestionnaireItem> {
        self.questions.iter()
    }

    #[allow(clippy::unused_self)] // Fixed by construction
    pub fn total_questions(&self) -> usize {
        QuestionId::COUNT
    }

    pub fn answered_count(&self) -> usize {
        self.items().filter(|q| q.status.is_answered()).count()
    }

    /// One line per item describing where it stands, used to seed extraction
    pub fn summary_lines(&self) -> String {
        let mut out = String::new();
        for q in self.items() {
            let _ = writeln!(
                out,
                "- {}: {} (status: {}, frequency: {})",
                q.question_id,
                q.question_text,
                q.status,
                q.frequency.as_deref().unwrap_or("null"),
            );
        }
        out.trim_end().to_string()
    }
}
