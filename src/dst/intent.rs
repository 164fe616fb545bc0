//! Intent tags produced by the upstream classifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified intent of the current user utterance.
///
/// The classifier may invent a tag for the "other" bucket, so unrecognized
/// tags are preserved in [`Intent::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    Greeting,
    AnswerSymptom,
    AnswerFrequency,
    AnswerCondition,
    Question,
    Request,
    OffTopic,
    ModifyTone,
    ModifyConversationStyle,
    AnswerTone,
    AnswerConversationStyle,
    /// The classifier itself gave up
    Failed,
    Other(String),
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Intent::Greeting => "greeting",
            Intent::AnswerSymptom => "answer_symptom",
            Intent::AnswerFrequency => "answer_frequency",
            Intent::AnswerCondition => "answer_condition",
            Intent::Question => "question",
            Intent::Request => "request",
            Intent::OffTopic => "off_topic",
            Intent::ModifyTone => "modify_tone",
            Intent::ModifyConversationStyle => "modify_conversation_style",
            Intent::AnswerTone => "answer_tone",
            Intent::AnswerConversationStyle => "answer_conversation_style",
            Intent::Failed => "failed",
            Intent::Other(tag) => tag,
        }
    }

    /// Whether the utterance carries symptom evidence worth tracking
    pub fn is_symptom(&self) -> bool {
        matches!(
            self,
            Intent::AnswerSymptom | Intent::AnswerFrequency | Intent::AnswerCondition
        )
    }
}

impl From<String> for Intent {
    fn from(tag: String) -> Self {
        let known = match tag.trim() {
            "greeting" => Some(Intent::Greeting),
            "answer_symptom" => Some(Intent::AnswerSymptom),
            "answer_frequency" => Some(Intent::AnswerFrequency),
            "answer_condition" => Some(Intent::AnswerCondition),
            "question" => Some(Intent::Question),
            "request" => Some(Intent::Request),
            "off_topic" => Some(Intent::OffTopic),
            "modify_tone" => Some(Intent::ModifyTone),
            "modify_conversation_style" => Some(Intent::ModifyConversationStyle),
            "answer_tone" => Some(Intent::AnswerTone),
            "answer_conversation_style" => Some(Intent::AnswerConversationStyle),
            "failed" => Some(Intent::Failed),
            _ => None,
        };
        known.unwrap_or(Intent::Other(tag))
    }
}

impl From<&str> for Intent {
    fn from(tag: &str) -> Self {
        Intent::from(tag.to_string())
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symptom_intents() {
        assert!(Intent::AnswerSymptom.is_symptom());
        assert!(Intent::AnswerFrequency.is_symptom());
        assert!(Intent::AnswerCondition.is_symptom());
        assert!(!Intent::Greeting.is_symptom());
        assert!(!Intent::Failed.is_symptom());
        assert!(!Intent::from("small_talk").is_symptom());
    }

    #[test]
    fn test_wire_format() {
        let intent: Intent = serde_json::from_str("\"answer_frequency\"").unwrap();
        assert_eq!(intent, Intent::AnswerFrequency);
        assert_eq!(serde_json::to_string(&intent).unwrap(), "\"answer_frequency\"");

        let other: Intent = serde_json::from_str("\"weather_chat\"").unwrap();
        assert_eq!(other, Intent::Other("weather_chat".to_string()));
        assert_eq!(other.to_string(), "weather_chat");
    }
}
