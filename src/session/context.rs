use std::fmt;
use std::str::FromStr;

use crate::api::PracticePrompt;
use crate::error::CoachError;

/// Which assessment variant the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentKind {
    Quick,
    Comprehensive,
    Topic,
}

impl AssessmentKind {
    /// Tag sent to the service in the multipart `type` field.
    pub fn wire_name(&self) -> &'static str {
        match self {
            AssessmentKind::Quick => "quick",
            AssessmentKind::Comprehensive => "comprehensive",
            AssessmentKind::Topic => "topic",
        }
    }
}

impl FromStr for AssessmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" => Ok(AssessmentKind::Quick),
            "comprehensive" => Ok(AssessmentKind::Comprehensive),
            "topic" => Ok(AssessmentKind::Topic),
            other => Err(format!("unknown assessment kind: {other}")),
        }
    }
}

/// One assessment selection. Read-only for the duration of a recording
/// cycle; discarded on reset or retake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentContext {
    pub kind: AssessmentKind,
    pub topic: Option<String>,
}

impl AssessmentContext {
    /// A topic assessment without a topic is rejected up front.
    pub fn new(kind: AssessmentKind, topic: Option<String>) -> Result<Self, CoachError> {
        if kind == AssessmentKind::Topic && topic.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(CoachError::Capture(
                "topic assessment requires a topic".to_string(),
            ));
        }
        Ok(Self { kind, topic })
    }

    pub fn wire_type(&self) -> &'static str {
        self.kind.wire_name()
    }

    /// Heading shown on the recording screen.
    pub fn title(&self) -> String {
        match self.kind {
            AssessmentKind::Quick => "Quick English Assessment".to_string(),
            AssessmentKind::Comprehensive => "Comprehensive English Assessment".to_string(),
            AssessmentKind::Topic => {
                format!("Topic Assessment: {}", capitalize(self.topic_or_default()))
            }
        }
    }

    /// Speaking instructions shown beneath the heading.
    pub fn instructions(&self) -> String {
        match self.kind {
            AssessmentKind::Quick => "Speak for 2-3 minutes about any topic. Talk about your \
                hobbies, work, or daily life. We'll analyze your English proficiency."
                .to_string(),
            AssessmentKind::Comprehensive => "Speak for 5-7 minutes. Cover different topics and \
                show your full range of English skills. Talk about experiences, opinions, and \
                future plans."
                .to_string(),
            AssessmentKind::Topic => format!(
                "Speak about {} for 3-5 minutes. Share your thoughts, experiences, and opinions \
                 naturally.",
                self.topic_or_default().to_lowercase()
            ),
        }
    }

    pub fn topic_or_default(&self) -> &str {
        self.topic.as_deref().unwrap_or("general")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Which practice category the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeKind {
    Conversation,
    Pronunciation,
    Vocabulary,
    Storytelling,
    Presentation,
    SongAnalysis,
}

impl PracticeKind {
    /// Tag sent to the service in prompt and coaching request bodies.
    pub fn wire_name(&self) -> &'static str {
        match self {
            PracticeKind::Conversation => "conversation",
            PracticeKind::Pronunciation => "pronunciation",
            PracticeKind::Vocabulary => "vocabulary",
            PracticeKind::Storytelling => "storytelling",
            PracticeKind::Presentation => "presentation",
            PracticeKind::SongAnalysis => "song_analysis",
        }
    }

    /// Marketing name shown in the session header.
    pub fn display_name(&self) -> &'static str {
        match self {
            PracticeKind::Conversation => "Conversation Mastery",
            PracticeKind::Pronunciation => "Pronunciation Perfection",
            PracticeKind::Vocabulary => "Advanced Vocabulary",
            PracticeKind::Storytelling => "Narrative Excellence",
            PracticeKind::Presentation => "Professional Presentation",
            PracticeKind::SongAnalysis => "Musical Language Learning",
        }
    }
}

impl FromStr for PracticeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversation" => Ok(PracticeKind::Conversation),
            "pronunciation" => Ok(PracticeKind::Pronunciation),
            "vocabulary" => Ok(PracticeKind::Vocabulary),
            "storytelling" => Ok(PracticeKind::Storytelling),
            "presentation" => Ok(PracticeKind::Presentation),
            "song_analysis" => Ok(PracticeKind::SongAnalysis),
            other => Err(format!("unknown practice kind: {other}")),
        }
    }
}

impl fmt::Display for PracticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Mutable state for an ongoing practice selection.
///
/// `level` and `topic` are free-form selection inputs, re-read at every
/// prompt/coaching dispatch. `current_prompt` and `last_transcription`
/// mutate independently across the session. The whole context is discarded
/// when the user changes practice type.
#[derive(Debug, Clone)]
pub struct PracticeContext {
    pub kind: PracticeKind,
    pub level: String,
    pub topic: String,
    pub current_prompt: Option<PracticePrompt>,
    pub last_transcription: Option<String>,
}

impl PracticeContext {
    pub fn new(kind: PracticeKind, level: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            kind,
            level: level.into(),
            topic: topic.into(),
            current_prompt: None,
            last_transcription: None,
        }
    }
}

/// Context tag carried by an armed recording, consulted at finalize time to
/// route the capture. Explicit per arm, never inferred from which control
/// fired last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingContext {
    Assessment(AssessmentContext),
    Practice,
}
