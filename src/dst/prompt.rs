//! Prompt construction for symptom extraction

use super::turn::TurnContext;
use crate::llm::{LlmMessage, LlmRequest, SystemContent};
use crate::questionnaire::QuestionnaireState;

/// Instructions for the extraction model. `{questions_info}` is replaced with
/// one status line per questionnaire item.
const SYMPTOM_ANALYSIS_PROMPT: &str = r#"당신은 신중한 정신의학 전문가입니다.
챗봇의 직전 질문과 사용자의 현재 발화를 분석하여 주어진 문진표 내의 우울 및 불안 관련 증상을 추출하고 업데이트해주세요.

현재 문항 상태:
{questions_info}

INSTRUCTIONS:
1. 현재 사용자 발화에서 증상 관련 표현을 찾으세요
2. 각 증상이 우울 및 불안의 증상으로 명확한지 판단하세요
3. 아래 데이터 구조에 맞게 정보를 업데이트하고 반환하세요
4. rawUserInput에 챗봇의 발화 내용을 포함하지 마세요

DATA STRUCTURE:
- questionId: 해당 문항 ID (Q1~Q10)
- questionText: 실제 문항 텍스트
- experience: 사용자가 해당 증상을 경험하고 있는지 여부 ("yes", "no", "unknown")
    - yes: 사용자가 해당 증상을 경험하고 있다고 명확히 언급했을 때
    - no: 사용자가 명확히 해당 증상을 경험하지 않는다고 표현했을 때
    - unknown: 관련 언급이 없거나 모호한 경우
- status: 답변 완료 상태 ("unanswered", "checking", "asking", "conflict", "answered")
    - unanswered: 관련 언급이 전혀 없는 상태
    - checking: 관련 언급은 있지만 애매하여 추가 확인이 필요한 상태
    - asking: 사용자가 증상을 경험하고 있다고 답하여 증상의 빈도나 맥락에 대해 추가로 질문해야 하는 상태
    - answered: 증상의 유무 및 빈도나 맥락에 대한 명확하고 구체적인 답변이 완료된 상태
    - conflict: 이전에 수집된 문항과 상충되거나 모순이 있는 경우
- rawUserInput: 증상과 관련된 사용자 발화 리스트 (업데이트할 내용이 있다면 기존 내역에 새로운 요소를 추가)
- frequency: 해당 증상의 발생 빈도 (명확한 빈도가 아니라면 추출하지 마세요)
- condition: 해당 증상 발생과 관련된 조건이나 이유 (예: "회사가 너무 바빠서", "시험 때문에", "가족 문제로")
- note: 해당 증상과 관련된 추가 정보
- conflict: 모순 내용과 그 해결 기록
- updated: 이번 시점에 업데이트 되었는지 여부 (true/false)

CAUTION:
1. 경험 유무(experience)에 대한 언급은 있으나 명확하지 않은 경우 status를 "checking"으로 설정하세요
2. 사용자가 증상을 경험하고 있어 맥락이나 빈도에 대한 추가 질문이 필요한 경우 status를 "asking"으로 설정하세요
3. 사용자가 증상을 경험하고 있으며 맥락 또는 빈도에 대한 답변이 수집된 경우 status를 "answered"로 설정하세요
4. 현재 발화에서 문진 항목 내 증상이 관찰되지 않은 경우 빈 배열 []을 반환하세요
5. rawUserInput은 반드시 기존 내역에 현재 발화에서 관측된 내용을 추가한 리스트로 반환하세요
6. 현재 발화가 이전에 수집된 문항과 상충되거나 모순이 있는 경우 status를 "conflict"로 설정하고 그 내용을 conflict 항목에 기록하세요.
이후 챗봇이 충돌에 대해 확인하는 메시지를 보낼 것입니다 (예: 이전에는 ~했는데, 지금은 ~이라고 답했습니다, 어느 쪽이 맞을까요?). 그에 대한 답변이 온 경우:
    a. experience 항목을 정정된 내용에 맞게 수정하세요
    b. condition, frequency를 상황에 맞게 업데이트하세요
    c. rawUserInput에 새로운 답변을 추가하세요
    d. status를 "checking"으로 설정하세요
    e. conflict 항목에 충돌을 해결한 기록을 추가하세요

JSON 배열 형태로 답변해주세요:
[
    {
        "questionId": "[해당 문항 ID]",
        "questionText": "[실제 문항 텍스트]",
        "experience": "[yes, no, or unknown]",
        "status": "[unanswered, checking, asking, answered, or conflict]",
        "rawUserInput": ["[증상 관련 사용자 발화 리스트]"],
        "frequency": "[빈도 내용 또는 null]",
        "condition": "[조건/이유 내용 또는 null]",
        "note": "[추가 정보 또는 null]",
        "conflict": "[모순 내용 또는 null]",
        "updated": "[true or false]"
    }
]"#;

/// Sampling settings for the extraction call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 500,
        }
    }
}

pub fn system_prompt(state: &QuestionnaireState) -> String {
    SYMPTOM_ANALYSIS_PROMPT.replace("{questions_info}", &state.summary_lines())
}

pub fn user_prompt(turn: &TurnContext) -> String {
    format!(
        "마지막 챗봇 발화:\n{}\n사용자 답변: {}\n의도 분석 결과: {}",
        turn.last_bot_message, turn.user_message, turn.intent
    )
}

pub fn build_request(
    state: &QuestionnaireState,
    turn: &TurnContext,
    settings: ExtractionSettings,
) -> LlmRequest {
    LlmRequest {
        system: vec![SystemContent::new(system_prompt(state))],
        messages: vec![LlmMessage::user(user_prompt(turn))],
        max_tokens: Some(settings.max_tokens),
        temperature: Some(settings.temperature),
    }
}
