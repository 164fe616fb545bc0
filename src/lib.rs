//! Screening dialogue state tracker
//!
//! Keeps the canonical state of a ten-item depression and anxiety screening
//! questionnaire across a conversation. Each user turn is run through an
//! LLM-backed extraction step, and the resulting candidate updates are merged
//! deterministically into the previous state.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dst;
pub mod llm;
pub mod questionnaire;
pub mod retry;
