//! Result renderer boundary.
//!
//! The controller produces display side effects only through this trait.
//! Implementations are free to paint however they like; the console
//! implementation here logs through tracing for the CLI binary.

use tracing::info;

use crate::api::PracticePrompt;
use crate::report::{AnalysisReport, CoachingReport};

/// Consumes structured results and loading/recording signals.
///
/// Loading is a single visual channel: `loading_finished` is guaranteed to
/// follow every `loading_started`, on success and failure alike.
pub trait ResultRenderer: Send + Sync {
    fn loading_started(&self, message: &str);
    fn loading_finished(&self);

    /// A recording screen was opened for an assessment selection.
    fn show_recording_screen(&self, title: &str, instructions: &str);
    fn recording_state_changed(&self, recording: bool);
    /// Once per second while armed, `MM:SS` elapsed display.
    fn recording_tick(&self, elapsed: &str);

    fn show_transcription(&self, text: &str);
    fn show_analysis(&self, report: &AnalysisReport);
    fn clear_assessment_results(&self);

    /// A practice category was selected.
    fn show_practice_selected(&self, display_name: &str);
    fn show_prompt(&self, prompt: &PracticePrompt);
    fn show_practice_transcription(&self, text: &str);
    fn show_coaching(&self, report: &CoachingReport);
    fn clear_practice_results(&self);
    fn clear_coaching(&self);
    fn practice_cleared(&self);
}

/// Format elapsed whole seconds as `MM:SS`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Renderer for the CLI binary: structured results go to stdout, signals to
/// the log.
#[derive(Default)]
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ResultRenderer for ConsoleRenderer {
    fn loading_started(&self, message: &str) {
        info!("{message}");
    }

    fn loading_finished(&self) {
        info!("Done");
    }

    fn show_recording_screen(&self, title: &str, instructions: &str) {
        println!("\n=== {title} ===\n{instructions}\n");
    }

    fn recording_state_changed(&self, recording: bool) {
        info!(recording, "Recording state changed");
    }

    fn recording_tick(&self, elapsed: &str) {
        info!("Recording... {elapsed}");
    }

    fn show_transcription(&self, text: &str) {
        println!("\nTranscription:\n{text}\n");
    }

    fn show_analysis(&self, report: &AnalysisReport) {
        println!("Overall grade: {}", report.overall_grade);
        println!(
            "CEFR level: {} ({})",
            report.cefr_level, report.level_description
        );
        println!("Speaking rate: {}", report.speaking_rate);
        println!("Filler words: {}", report.filler_count);
        println!("\nPronunciation: {}", report.pronunciation_feedback);
        println!("Vocabulary: {}", report.vocabulary_feedback);
        if let Some(words) = &report.advanced_words {
            println!("  Advanced words: {words}");
        }
        println!("Grammar: {}", report.grammar_feedback);
        for strength in &report.grammar_strengths {
            println!("  + {strength}");
        }
        for area in &report.grammar_areas {
            println!("  - {area}");
        }
        println!("Fluency: {}", report.fluency_feedback);
        println!("\nImprovement plan:");
        for plan in [
            &report.pronunciation_plan,
            &report.vocabulary_plan,
            &report.grammar_plan,
            &report.fluency_plan,
        ] {
            for item in plan {
                println!("  * {item}");
            }
        }
        println!("\nNext level: {}", report.next_level_path);
    }

    fn clear_assessment_results(&self) {}

    fn show_practice_selected(&self, display_name: &str) {
        println!("\n=== {display_name} ===");
    }

    fn show_prompt(&self, prompt: &PracticePrompt) {
        println!("\nPrompt: {}", prompt.prompt);
        println!("Instructions: {}", prompt.instructions);
    }

    fn show_practice_transcription(&self, text: &str) {
        println!("\nYou said:\n{text}");
    }

    fn show_coaching(&self, report: &CoachingReport) {
        println!("\nFeedback: {}", report.immediate_feedback);
        println!("Pronunciation: {}", report.pronunciation_notes);
        println!("Vocabulary: {}", report.vocabulary_tips);
        println!("Fluency: {}", report.fluency_tips);
        if report.corrections.is_empty() {
            println!("Corrections: No major corrections needed!");
        } else {
            for correction in &report.corrections {
                println!("Correction: {correction}");
            }
        }
        println!("{}", report.encouragement);
        println!("Next challenge: {}", report.next_challenge);
    }

    fn clear_practice_results(&self) {}

    fn clear_coaching(&self) {}

    fn practice_cleared(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_formats_as_mm_ss() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(61), "01:01");
        assert_eq!(format_elapsed(600), "10:00");
    }
}
