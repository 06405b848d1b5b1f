//! Wire types for the coaching service.
//!
//! Every response field beyond `success` is optional: the service is known
//! to return partial payloads, and absence of any field must not fail
//! deserialization. Display fallbacks live in the `report` module.

use serde::{Deserialize, Serialize};

/// `POST /analyze_speech` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    pub transcription: Option<String>,
    pub analysis: Option<Analysis>,
    pub error: Option<String>,
}

/// `POST /transcribe_audio` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscribeResponse {
    #[serde(default)]
    pub success: bool,
    pub transcription: Option<String>,
    pub error: Option<String>,
}

/// `POST /get_practice_prompt` request body.
#[derive(Debug, Serialize)]
pub struct PromptRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub topic: String,
    pub level: String,
}

/// `POST /get_practice_prompt` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptResponse {
    #[serde(default)]
    pub success: bool,
    pub prompt: Option<PracticePrompt>,
    pub error: Option<String>,
}

/// One served practice prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PracticePrompt {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub instructions: String,
}

/// `POST /practice_session` request body.
#[derive(Debug, Serialize)]
pub struct CoachingRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub topic: String,
    pub input: String,
    pub level: String,
}

/// `POST /practice_session` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoachingResponse {
    #[serde(default)]
    pub success: bool,
    pub coaching: Option<Coaching>,
    pub error: Option<String>,
}

/// Structured coaching feedback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Coaching {
    pub immediate_feedback: Option<String>,
    pub pronunciation_notes: Option<String>,
    pub vocabulary_enhancement: Option<Vec<String>>,
    pub fluency_tips: Option<String>,
    pub encouragement: Option<String>,
    pub next_challenge: Option<String>,
    #[serde(default)]
    pub corrections: Vec<String>,
}

/// Full proficiency analysis. Grades and speaking rate arrive as JSON
/// numbers; the analyzer emits both integers and one-decimal floats for
/// them, so both are decoded as `f64`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Analysis {
    pub overall_grade: Option<f64>,
    pub cefr_level: Option<String>,
    pub level_description: Option<String>,
    pub words_per_minute: Option<f64>,
    pub pronunciation: Option<Dimension>,
    pub vocabulary: Option<Dimension>,
    pub grammar: Option<Dimension>,
    pub fluency: Option<Dimension>,
    pub pronunciation_plan: Option<Vec<String>>,
    pub vocabulary_plan: Option<Vec<String>>,
    pub grammar_plan: Option<Vec<String>>,
    pub fluency_plan: Option<Vec<String>>,
    pub next_level_path: Option<String>,
}

/// Per-dimension analysis payload. The service reuses one shape for all
/// four dimensions and only populates the lists that apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dimension {
    pub feedback: Option<String>,
    pub advanced_words: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
    pub areas: Option<Vec<String>>,
    pub filler_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_with_fractional_rate_deserializes() {
        let resp: AnalyzeResponse = serde_json::from_str(
            r#"{"success":true,"transcription":"I enjoy hiking","analysis":{"overall_grade":6.5,"words_per_minute":132.5}}"#,
        )
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.analysis.unwrap().words_per_minute, Some(132.5));
    }
}
