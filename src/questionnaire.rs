//! Questionnaire data model
//!
//! The screening questionnaire has a fixed set of ten items. Identity is a
//! closed enum and the container is a fixed-size array indexed by it, so the
//! item set can never grow or shrink once a state exists.

mod item;
mod state;
mod update;

pub use item::{Experience, ItemStatus, QuestionId, QuestionnaireItem, UnknownQuestionId};
pub use state::{QuestionnaireState, Questions, StateError};
pub use update::CandidateUpdate;
