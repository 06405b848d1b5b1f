//! Client for the remote analysis/coaching/prompt-generation service.

mod client;
mod types;

pub use client::{CoachApi, HttpCoachApi};
pub use types::{
    Analysis, AnalyzeResponse, Coaching, CoachingRequest, CoachingResponse, Dimension,
    PracticePrompt, PromptRequest, PromptResponse, TranscribeResponse,
};
