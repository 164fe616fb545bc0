//! Candidate updates proposed by the extraction step

use super::item::{Experience, ItemStatus, QuestionId, UnknownQuestionId};
use serde::{Deserialize, Deserializer, Serialize};

/// Proposed partial mutation of one questionnaire item.
///
/// Fields left as `None` mean "no change proposed". For the nullable text
/// fields, `Some(None)` is an explicit request to clear the value. The id is
/// kept verbatim so that an unknown id survives parsing and is rejected by
/// the merger instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandidateUpdate {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Experience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_user_input: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub frequency: Option<Option<String>>,
    #[serde(
        default,
        alias = "context",
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub conflict: Option<Option<String>>,
    /// Extractor's claim that this item was answered this turn
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated: Option<bool>,
}

impl CandidateUpdate {
    pub fn new(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            ..Self::default()
        }
    }

    /// Resolve the proposed id against the fixed question set
    pub fn target(&self) -> Result<QuestionId, UnknownQuestionId> {
        self.question_id.parse()
    }

    /// True only when the extractor explicitly flagged this item as answered
    pub fn flags_answered(&self) -> bool {
        self.updated == Some(true)
    }
}

/// A present key (even `null`) becomes `Some(..)`; a missing key stays `None`
/// through `#[serde(default)]`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Models sometimes quote booleans; accept `true`, `"true"`, and `null`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Text(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected boolean for `updated`, got {other:?}"
            ))),
        },
    }
}
