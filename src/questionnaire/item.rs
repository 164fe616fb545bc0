//! Questionnaire item types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of one of the ten fixed screening questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionId {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
    Q6,
    Q7,
    Q8,
    Q9,
    Q10,
}

/// A question id string outside Q1..Q10
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown question id: {0}")]
pub struct UnknownQuestionId(pub String);

impl QuestionId {
    pub const COUNT: usize = 10;

    pub const ALL: [QuestionId; Self::COUNT] = [
        QuestionId::Q1,
        QuestionId::Q2,
        QuestionId::Q3,
        QuestionId::Q4,
        QuestionId::Q5,
        QuestionId::Q6,
        QuestionId::Q7,
        QuestionId::Q8,
        QuestionId::Q9,
        QuestionId::Q10,
    ];

    /// Position of this question in the fixed container
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionId::Q1 => "Q1",
            QuestionId::Q2 => "Q2",
            QuestionId::Q3 => "Q3",
            QuestionId::Q4 => "Q4",
            QuestionId::Q5 => "Q5",
            QuestionId::Q6 => "Q6",
            QuestionId::Q7 => "Q7",
            QuestionId::Q8 => "Q8",
            QuestionId::Q9 => "Q9",
            QuestionId::Q10 => "Q10",
        }
    }

    /// Question text a fresh session starts with
    pub fn default_text(self) -> &'static str {
        match self {
            QuestionId::Q1 => "최근 스트레스를 받거나 나를 힘들게 하는 일이 있다",
            QuestionId::Q2 => "기분이 가라앉거나, 우울하거나, 희망이 없다고 느낀다",
            QuestionId::Q3 => "평소 하던 일에 대한 흥미가 없어지거나 즐거움을 느끼지 못한다",
            QuestionId::Q4 => "잠들기가 어렵거나 자주 깨거나 혹은 평소와 다르게 너무 많이 잔다",
            QuestionId::Q5 => "최근 매사에 피곤하고 기운이 없다",
            QuestionId::Q6 => {
                "내가 무언가를 잘못했거나 실패했다는 생각이 들거나 자신과 가족을 실망시켰다고 생각한다."
            }
            QuestionId::Q7 => "차라리 죽는 것이 더 낫겠다거나 혹은 자해할 생각을 한다",
            QuestionId::Q8 => {
                "초조하거나, 마음이 불안하거나, 혹시 나쁜 일이 생길까 조마조마한 느낌을 받는다"
            }
            QuestionId::Q9 => "최근 여러 가지 일에 대해 너무 많은 걱정을 한다",
            QuestionId::Q10 => "걱정이 한 번 시작되면 쉽게 멈추거나 조절하기 어렵다",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionId {
    type Err = UnknownQuestionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| UnknownQuestionId(s.to_string()))
    }
}

/// Whether the user has confirmed experiencing the symptom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    Yes,
    No,
    #[default]
    Unknown,
}

/// Progress of one line of questioning.
///
/// `Unanswered` is the only initial value and `Answered` the only settled one.
/// The others are investigative. Moving backwards (for example from
/// `Answered` to `Conflict` or `Checking` after a contradiction) is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Unanswered,
    Checking,
    Asking,
    Conflict,
    Answered,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Unanswered => "unanswered",
            ItemStatus::Checking => "checking",
            ItemStatus::Asking => "asking",
            ItemStatus::Conflict => "conflict",
            ItemStatus::Answered => "answered",
        }
    }

    pub fn is_answered(self) -> bool {
        matches!(self, ItemStatus::Answered)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One screening question and the evidence gathered for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireItem {
    pub question_id: QuestionId,
    pub question_text: String,
    #[serde(default)]
    pub experience: Experience,
    #[serde(default)]
    pub status: ItemStatus,
    /// Utterances attributed to this item, oldest first. Only ever grows.
    #[serde(default)]
    pub raw_user_input: Vec<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default, alias = "context")]
    pub condition: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub conflict: Option<String>,
    /// Touched during the current turn
    #[serde(default)]
    pub updated: bool,
}

impl QuestionnaireItem {
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            question_text: question_id.default_text().to_string(),
            experience: Experience::Unknown,
            status: ItemStatus::Unanswered,
            raw_user_input: Vec::new(),
            frequency: None,
            condition: None,
            note: None,
            conflict: None,
            updated: false,
        }
    }

    /// Record newly attributed utterances without losing or reordering old ones.
    ///
    /// Extractors usually echo the whole list back with new entries at the
    /// end; that list is adopted as-is. Anything else is treated as a batch
    /// of candidates and only unseen utterances are appended.
    pub fn record_utterances(&mut self, proposed: &[String]) {
        if proposed.starts_with(&self.raw_user_input) {
            self.raw_user_input = proposed.to_vec();
            return;
        }
        for utterance in proposed {
            if !self.raw_user_input.contains(utterance) {
                self.raw_user_input.push(utterance.clone());
            }
        }
    }
}
