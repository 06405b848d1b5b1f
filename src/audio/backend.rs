use tokio::sync::mpsc;

use crate::error::CoachError;

/// Configuration for a capture backend.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate (native input is resampled down if needed)
    pub sample_rate: u32,
    /// Target channel count (1 = mono)
    pub channels: u16,
    /// Fragment cadence in milliseconds: buffered PCM is cut into one
    /// opaque fragment per interval while capturing
    pub fragment_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            fragment_ms: 1000,
        }
    }
}

/// Bridge to the platform's audio-capture primitive.
///
/// `start` yields a channel of opaque encoded fragments in arrival order;
/// only fragments of size > 0 are ever delivered. `stop` releases the
/// hardware stream (a redundant stop is a no-op), flushes any
/// buffered audio as a final fragment, and closes the channel exactly once.
/// Channel closure is the finalize signal: a receiver that drains to `None`
/// has seen every fragment the recording produced.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Probe microphone access. Fails with `PermissionDenied` if the user
    /// declined or no device exists; callers surface that once, non-fatally.
    async fn open(&mut self) -> Result<(), CoachError>;

    /// Begin capturing and return the fragment receiver.
    async fn start(&mut self) -> Result<mpsc::Receiver<Vec<u8>>, CoachError>;

    /// Stop capturing and release the device. Safe to call redundantly.
    async fn stop(&mut self) -> Result<(), CoachError>;

    /// Whether the backend is currently capturing.
    fn is_capturing(&self) -> bool;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
