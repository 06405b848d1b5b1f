//! Recording session state machine and workflow contexts.
//!
//! The session enforces legal arm/finalize transitions and owns the
//! fragment buffer; the context types tag each recording with the workflow
//! (assessment or practice) that will consume the finished capture.

mod context;
mod recording;

pub use context::{
    AssessmentContext, AssessmentKind, PracticeContext, PracticeKind, RecordingContext,
};
pub use recording::{FinishedCapture, RecordingSession, SessionStatus};
