//! Dialogue state tracking
//!
//! Turns one user utterance into the next canonical questionnaire state:
//! the extraction adapter asks a model for candidate updates, the merger
//! folds them into the previous state, and the coordinator sequences the two
//! with a no-op fallback.

mod coordinator;
mod extraction;
mod intent;
mod merge;
mod parse;
mod prompt;
mod turn;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::TurnCoordinator;
pub use extraction::{ExtractionAdapter, ExtractionCapability, ExtractionError, LlmExtraction};
pub use intent::Intent;
pub use merge::{merge, MergeResult};
pub use parse::{parse_candidates, ParseError, NO_EVIDENCE_MARKER};
pub use prompt::ExtractionSettings;
pub use turn::{TurnContext, TurnOutcome};
