use thiserror::Error;

/// Error taxonomy for the coaching controller.
///
/// The network-facing variants are caught at the controller boundary and
/// converted into a single notification each.
/// `AlreadyArmed` and `NotArmed` are session guard errors for callers that
/// skipped the status check; they never reach the notification channel.
#[derive(Debug, Error)]
pub enum CoachError {
    /// Device access refused or no input device present. Warned once at
    /// startup, non-fatal: the rest of the controller stays usable.
    #[error("microphone access denied: {0}")]
    PermissionDenied(String),

    /// Recording stopped with zero buffered fragments. Local, no network
    /// call is made.
    #[error("no audio captured")]
    NoAudioCaptured,

    /// Coaching requested before any transcription exists. Local.
    #[error("no transcription available")]
    NoTranscriptionAvailable,

    /// Transport-level failure reaching the coaching service.
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service answered with `success: false`. Carries the
    /// server-supplied error string, or the operation's fallback message
    /// when the server sent none.
    #[error("{0}")]
    ServerReportedFailure(String),

    /// A `success: true` response arrived without its payload. Surfaced
    /// with the operation's generic fallback, never the raw detail.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// `arm()` called while a recording is already in progress.
    #[error("recording already in progress")]
    AlreadyArmed,

    /// Fragment append or finalize without an armed session.
    #[error("no recording in progress")]
    NotArmed,

    /// Capture device or encoding failure outside the permission path.
    #[error("audio capture error: {0}")]
    Capture(String),
}

impl CoachError {
    /// Build the error for a `success: false` response: the server string
    /// takes priority over the operation's generic fallback.
    pub fn server_failure(error: Option<String>, fallback: &str) -> Self {
        CoachError::ServerReportedFailure(error.unwrap_or_else(|| fallback.to_string()))
    }
}
