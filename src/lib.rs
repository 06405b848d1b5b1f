pub mod api;
pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod notify;
pub mod render;
pub mod report;
pub mod session;

pub use api::{CoachApi, HttpCoachApi, PracticePrompt};
pub use audio::{CaptureBackend, CaptureConfig, MicBackend, ScriptedBackend};
pub use config::Config;
pub use controller::CoachController;
pub use error::CoachError;
pub use notify::{Notification, Notifier, Severity};
pub use render::{ConsoleRenderer, ResultRenderer};
pub use report::{AnalysisReport, CoachingReport};
pub use session::{
    AssessmentContext, AssessmentKind, FinishedCapture, PracticeContext, PracticeKind,
    RecordingContext, RecordingSession, SessionStatus,
};
