//! Display-ready views of server payloads.
//!
//! The service routinely returns partial analysis and coaching objects;
//! every missing field gets a fixed fallback display value here so the
//! renderer always receives a complete report. The fallback strings are
//! part of the observed contract and are kept verbatim.

use crate::api::{Analysis, Coaching};

const GRADE_FALLBACK: &str = "5.0";
const CEFR_FALLBACK: &str = "B1";
const LEVEL_DESCRIPTION_FALLBACK: &str = "Intermediate";
const WPM_FALLBACK: &str = "145";
const FILLER_FALLBACK: u32 = 5;

/// Proficiency analysis with every display slot filled.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub overall_grade: String,
    pub cefr_level: String,
    pub level_description: String,
    pub pronunciation_feedback: String,
    pub vocabulary_feedback: String,
    pub grammar_feedback: String,
    pub fluency_feedback: String,
    /// Joined with ", " when present; `None` leaves the slot untouched.
    pub advanced_words: Option<String>,
    pub grammar_strengths: Vec<String>,
    pub grammar_areas: Vec<String>,
    pub speaking_rate: String,
    pub filler_count: String,
    pub pronunciation_plan: Vec<String>,
    pub vocabulary_plan: Vec<String>,
    pub grammar_plan: Vec<String>,
    pub fluency_plan: Vec<String>,
    pub next_level_path: String,
}

impl From<&Analysis> for AnalysisReport {
    fn from(analysis: &Analysis) -> Self {
        let dimension_feedback = |dim: &Option<crate::api::Dimension>, fallback: &str| {
            dim.as_ref()
                .and_then(|d| d.feedback.clone())
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            overall_grade: analysis
                .overall_grade
                .map(format_number)
                .unwrap_or_else(|| GRADE_FALLBACK.to_string()),
            cefr_level: analysis
                .cefr_level
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| CEFR_FALLBACK.to_string()),
            level_description: analysis
                .level_description
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| LEVEL_DESCRIPTION_FALLBACK.to_string()),
            pronunciation_feedback: dimension_feedback(
                &analysis.pronunciation,
                "Your pronunciation shows good clarity with room for improvement in stress \
                 patterns and intonation.",
            ),
            vocabulary_feedback: dimension_feedback(
                &analysis.vocabulary,
                "You demonstrate solid vocabulary usage. Focus on incorporating more \
                 sophisticated expressions and idiomatic language.",
            ),
            grammar_feedback: dimension_feedback(
                &analysis.grammar,
                "Your grammar foundation is strong. Work on complex sentence structures and \
                 advanced tense usage.",
            ),
            fluency_feedback: dimension_feedback(
                &analysis.fluency,
                "Your speech flows naturally with minimal hesitation. Focus on reducing filler \
                 words and smoother transitions.",
            ),
            advanced_words: analysis
                .vocabulary
                .as_ref()
                .and_then(|v| v.advanced_words.as_ref())
                .map(|words| words.join(", ")),
            grammar_strengths: list_or(
                analysis.grammar.as_ref().and_then(|g| g.strengths.as_ref()),
                &["Accurate basic tense usage", "Good sentence structure"],
            ),
            grammar_areas: list_or(
                analysis.grammar.as_ref().and_then(|g| g.areas.as_ref()),
                &["Complex conditionals", "Advanced connectors"],
            ),
            speaking_rate: format!(
                "{} words/minute",
                analysis
                    .words_per_minute
                    .map(format_number)
                    .unwrap_or_else(|| WPM_FALLBACK.to_string())
            ),
            filler_count: format!(
                "{} instances",
                analysis
                    .fluency
                    .as_ref()
                    .and_then(|f| f.filler_count)
                    .unwrap_or(FILLER_FALLBACK)
            ),
            pronunciation_plan: list_or(
                analysis.pronunciation_plan.as_ref(),
                &[
                    "Practice tongue twisters daily for 10 minutes",
                    "Record yourself reading and compare with native speakers",
                    "Focus on word stress patterns",
                ],
            ),
            vocabulary_plan: list_or(
                analysis.vocabulary_plan.as_ref(),
                &[
                    "Learn 5 advanced synonyms daily",
                    "Study collocations and phrasal verbs",
                    "Read academic articles in your field",
                ],
            ),
            grammar_plan: list_or(
                analysis.grammar_plan.as_ref(),
                &[
                    "Practice conditional sentences daily",
                    "Study advanced connectors",
                    "Write complex sentences and get feedback",
                ],
            ),
            fluency_plan: list_or(
                analysis.fluency_plan.as_ref(),
                &[
                    "Practice speaking without filler words",
                    "Use transition phrases between ideas",
                    "Record yourself and identify patterns",
                ],
            ),
            next_level_path: analysis
                .next_level_path
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| {
                    "Continue practicing consistently to reach the next proficiency level. \
                     Focus on the priority areas identified above."
                        .to_string()
                }),
        }
    }
}

/// Coaching feedback with every display slot filled.
#[derive(Debug, Clone, PartialEq)]
pub struct CoachingReport {
    pub immediate_feedback: String,
    pub pronunciation_notes: String,
    pub vocabulary_tips: String,
    pub fluency_tips: String,
    pub encouragement: String,
    pub next_challenge: String,
    /// Empty means no corrections needed; the renderer shows its own
    /// "no corrections" copy for that.
    pub corrections: Vec<String>,
}

impl From<&Coaching> for CoachingReport {
    fn from(coaching: &Coaching) -> Self {
        let or = |value: &Option<String>, fallback: &str| {
            value
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            immediate_feedback: or(&coaching.immediate_feedback, "Great effort!"),
            pronunciation_notes: or(
                &coaching.pronunciation_notes,
                "Keep practicing your pronunciation",
            ),
            vocabulary_tips: coaching
                .vocabulary_enhancement
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| v.join(". "))
                .unwrap_or_else(|| "Expand your vocabulary".to_string()),
            fluency_tips: or(&coaching.fluency_tips, "Work on fluency"),
            encouragement: or(&coaching.encouragement, "Keep up the good work!"),
            next_challenge: or(&coaching.next_challenge, "Try more complex sentences"),
            corrections: coaching.corrections.clone(),
        }
    }
}

/// Grades and speaking rate arrive as JSON numbers; render integers
/// without a decimal point the way a JSON number stringifies, one-decimal
/// floats as-is.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn list_or(value: Option<&Vec<String>>, fallback: &[&str]) -> Vec<String> {
    match value {
        Some(list) if !list.is_empty() => list.clone(),
        _ => fallback.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Analysis;

    #[test]
    fn empty_analysis_gets_all_fallbacks() {
        let report = AnalysisReport::from(&Analysis::default());
        assert_eq!(report.overall_grade, "5.0");
        assert_eq!(report.cefr_level, "B1");
        assert_eq!(report.speaking_rate, "145 words/minute");
        assert_eq!(report.filler_count, "5 instances");
        assert_eq!(report.grammar_strengths.len(), 2);
        assert_eq!(report.pronunciation_plan.len(), 3);
        assert!(report.advanced_words.is_none());
    }

    #[test]
    fn grade_formats_like_a_json_number() {
        assert_eq!(format_number(6.5), "6.5");
        assert_eq!(format_number(7.0), "7");
    }

    #[test]
    fn fractional_words_per_minute_is_accepted() {
        let analysis: Analysis =
            serde_json::from_str(r#"{"overall_grade": 6.5, "words_per_minute": 132.5}"#).unwrap();
        let report = AnalysisReport::from(&analysis);
        assert_eq!(report.speaking_rate, "132.5 words/minute");
    }

    #[test]
    fn server_fields_win_over_fallbacks() {
        let analysis: Analysis = serde_json::from_str(
            r#"{
                "overall_grade": 6.5,
                "cefr_level": "C1",
                "words_per_minute": 160,
                "vocabulary": {"feedback": "Rich", "advanced_words": ["nuance", "venture"]},
                "fluency": {"filler_count": 2}
            }"#,
        )
        .unwrap();
        let report = AnalysisReport::from(&analysis);
        assert_eq!(report.overall_grade, "6.5");
        assert_eq!(report.cefr_level, "C1");
        assert_eq!(report.speaking_rate, "160 words/minute");
        assert_eq!(report.filler_count, "2 instances");
        assert_eq!(report.vocabulary_feedback, "Rich");
        assert_eq!(report.advanced_words.as_deref(), Some("nuance, venture"));
    }

    #[test]
    fn empty_coaching_gets_all_fallbacks() {
        let report = CoachingReport::from(&crate::api::Coaching::default());
        assert_eq!(report.immediate_feedback, "Great effort!");
        assert_eq!(report.vocabulary_tips, "Expand your vocabulary");
        assert!(report.corrections.is_empty());
    }
}
