use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::context::RecordingContext;
use crate::error::CoachError;

/// Where the session currently is in its lifecycle.
///
/// `Finalizing` is the transient phase inside [`RecordingSession::finalize`];
/// the machine always leaves it back to `Idle` before the call returns, so
/// observers only ever see `Idle` or `Armed` between operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Armed,
    Finalizing,
}

/// The finished blob handed to the orchestrator, tagged with the context
/// that was active at arm time and the generation the capture belongs to.
#[derive(Debug, Clone)]
pub struct FinishedCapture {
    pub blob: Vec<u8>,
    pub context: RecordingContext,
    pub duration: Duration,
    pub generation: u64,
}

/// Recording lifecycle state machine.
///
/// Pure state, no I/O: the controller wires the capture backend and the
/// elapsed-time ticker around it. Created once, re-armed on every recording
/// start, never destroyed.
#[derive(Debug)]
pub struct RecordingSession {
    status: SessionStatus,
    context: Option<RecordingContext>,
    started_at: Option<Instant>,
    fragments: Vec<Vec<u8>>,
    // Bumped on every arm; stamped into captures so superseded responses
    // can be discarded.
    generation: u64,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            context: None,
            started_at: None,
            fragments: Vec::new(),
            generation: 0,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_armed(&self) -> bool {
        self.status == SessionStatus::Armed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Elapsed recording time, only meaningful while armed.
    pub fn elapsed(&self) -> Option<Duration> {
        match self.status {
            SessionStatus::Armed => self.started_at.map(|t| t.elapsed()),
            _ => None,
        }
    }

    /// Arm the session for a new recording.
    ///
    /// Rejected while already armed; callers are expected to check
    /// [`status`](Self::status) first, so hitting `AlreadyArmed` is a
    /// programming error with no side effects on the running recording.
    pub fn arm(&mut self, context: RecordingContext) -> Result<u64, CoachError> {
        if self.status != SessionStatus::Idle {
            return Err(CoachError::AlreadyArmed);
        }

        self.fragments.clear();
        self.context = Some(context);
        self.started_at = Some(Instant::now());
        self.generation += 1;
        self.status = SessionStatus::Armed;

        info!(generation = self.generation, "Recording session armed");
        Ok(self.generation)
    }

    /// Append one captured fragment, preserving arrival order.
    ///
    /// Empty chunks are discarded, never stored.
    pub fn append_fragment(&mut self, chunk: Vec<u8>) -> Result<(), CoachError> {
        if self.status != SessionStatus::Armed {
            return Err(CoachError::NotArmed);
        }
        if chunk.is_empty() {
            debug!("Dropping empty capture fragment");
            return Ok(());
        }
        self.fragments.push(chunk);
        Ok(())
    }

    /// Stop the recording and concatenate the buffered fragments.
    ///
    /// With at least one fragment this yields a [`FinishedCapture`]; with
    /// none it fails with `NoAudioCaptured` and never produces an empty
    /// blob. Either way the session returns to `Idle` and stays reusable.
    pub fn finalize(&mut self) -> Result<FinishedCapture, CoachError> {
        if self.status != SessionStatus::Armed {
            return Err(CoachError::NotArmed);
        }

        self.status = SessionStatus::Finalizing;
        let duration = self
            .started_at
            .take()
            .map(|t| t.elapsed())
            .unwrap_or_default();
        let context = self.context.take();
        let fragments = std::mem::take(&mut self.fragments);
        self.status = SessionStatus::Idle;

        if fragments.is_empty() {
            info!("Recording finalized with no audio");
            return Err(CoachError::NoAudioCaptured);
        }

        let blob: Vec<u8> = fragments.into_iter().flatten().collect();
        info!(
            bytes = blob.len(),
            secs = duration.as_secs(),
            "Recording finalized"
        );

        Ok(FinishedCapture {
            blob,
            // Context is always set while armed; Practice is the safe fallback.
            context: context.unwrap_or(RecordingContext::Practice),
            duration,
            generation: self.generation,
        })
    }

    /// Force the session back to `Idle` from any status.
    ///
    /// Clears the fragment buffer without emitting a capture or an error.
    /// Used on navigation away, retry, or explicit reset.
    pub fn reset(&mut self) {
        if self.status != SessionStatus::Idle || !self.fragments.is_empty() {
            debug!("Recording session reset");
        }
        self.status = SessionStatus::Idle;
        self.context = None;
        self.started_at = None;
        self.fragments.clear();
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}
