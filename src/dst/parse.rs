//! Lenient parsing of extraction output
//!
//! Models wrap JSON in prose or markdown fences, answer with a bare object
//! when one item changed, or return an empty array when nothing was found.
//! All of those are accepted here; anything without recognizable structure
//! is a [`ParseError`] so the caller can retry.

use crate::questionnaire::CandidateUpdate;
use serde_json::Value;
use thiserror::Error;

/// Literal the extractor returns when the utterance has no symptom evidence
pub const NO_EVIDENCE_MARKER: &str = "[]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No JSON array or object found in extraction output")]
    NoStructure,
    #[error("Invalid JSON in extraction output: {0}")]
    InvalidJson(String),
    #[error("Extraction output held no usable updates ({dropped} malformed)")]
    NoUsableUpdates { dropped: usize },
}

/// Parse raw extraction text into candidate updates.
///
/// Returns `Ok(vec![])` only for the explicit no-evidence marker. An array
/// that parses but yields nothing usable is an error, not "no evidence".
pub fn parse_candidates(raw: &str) -> Result<Vec<CandidateUpdate>, ParseError> {
    let cleaned = strip_fences(raw);
    if cleaned == NO_EVIDENCE_MARKER {
        return Ok(Vec::new());
    }

    let elements = extract_elements(&cleaned)?;
    let total = elements.len();

    let updates: Vec<CandidateUpdate> = elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value(element) {
            Ok(update) => Some(update),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed candidate update");
                None
            }
        })
        .collect();

    if updates.is_empty() {
        return Err(ParseError::NoUsableUpdates { dropped: total });
    }
    if updates.len() < total {
        tracing::warn!(
            kept = updates.len(),
            dropped = total - updates.len(),
            "Some candidate updates were malformed"
        );
    }
    Ok(updates)
}

fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Pull the JSON elements out of cleaned text.
///
/// The whole text is tried first. Failing that, the outermost `[`..`]` and
/// `{`..`}` spans are tried in the order they start, so an object that
/// itself holds arrays is never cut down to one of them.
fn extract_elements(cleaned: &str) -> Result<Vec<Value>, ParseError> {
    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return elements_of(value);
    }

    let mut spans: Vec<(usize, usize)> = [('[', ']'), ('{', '}')]
        .into_iter()
        .filter_map(|(open, close)| {
            let start = cleaned.find(open)?;
            let end = cleaned.rfind(close)?;
            (start < end).then_some((start, end))
        })
        .collect();
    spans.sort_unstable();

    let mut first_error = None;
    for (start, end) in spans {
        let Some(span) = cleaned.get(start..=end) else {
            continue;
        };
        match serde_json::from_str::<Value>(span) {
            Ok(value) => return elements_of(value),
            Err(e) => {
                first_error.get_or_insert(ParseError::InvalidJson(e.to_string()));
            }
        }
    }

    Err(first_error.unwrap_or(ParseError::NoStructure))
}

/// An array yields its elements; a lone object becomes a one-element list
fn elements_of(value: Value) -> Result<Vec<Value>, ParseError> {
    match value {
        Value::Array(elements) => Ok(elements),
        object @ Value::Object(_) => Ok(vec![object]),
        _ => Err(ParseError::NoStructure),
    }
}
