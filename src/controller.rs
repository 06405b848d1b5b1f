//! Analysis request orchestration.
//!
//! The controller owns the recording session, the capture backend, the
//! service client, the renderer, and the notification channel, and wires
//! them into the two user workflows. Every network-facing operation follows
//! the same two-phase protocol: loading-start, settle, loading-end
//! unconditionally, then either rendering or a single failure notification.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::{CoachApi, CoachingRequest, PracticePrompt, PromptRequest};
use crate::audio::{wav, CaptureBackend, CaptureConfig};
use crate::error::CoachError;
use crate::notify::{Notifier, Severity};
use crate::render::{format_elapsed, ResultRenderer};
use crate::report::{AnalysisReport, CoachingReport};
use crate::session::{
    AssessmentContext, AssessmentKind, FinishedCapture, PracticeContext, PracticeKind,
    RecordingContext, RecordingSession,
};

pub struct CoachController {
    session: Arc<Mutex<RecordingSession>>,
    capture: Mutex<Box<dyn CaptureBackend>>,
    capture_config: CaptureConfig,
    api: Arc<dyn CoachApi>,
    renderer: Arc<dyn ResultRenderer>,
    notifier: Notifier,
    practice: Mutex<Option<PracticeContext>>,
    forwarder: Mutex<Option<JoinHandle<()>>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl CoachController {
    pub fn new(
        capture: Box<dyn CaptureBackend>,
        capture_config: CaptureConfig,
        api: Arc<dyn CoachApi>,
        renderer: Arc<dyn ResultRenderer>,
        notifier: Notifier,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(RecordingSession::new())),
            capture: Mutex::new(capture),
            capture_config,
            api,
            renderer,
            notifier,
            practice: Mutex::new(None),
            forwarder: Mutex::new(None),
            ticker: Mutex::new(None),
        }
    }

    /// Probe microphone access once at startup. A refusal is a one-time
    /// non-fatal warning: the rest of the controller stays usable.
    pub async fn check_microphone(&self) {
        let mut capture = self.capture.lock().await;
        match capture.open().await {
            Ok(()) => info!("Microphone permission granted"),
            Err(e) => {
                warn!("Microphone permission check failed: {e}");
                self.notifier.publish(
                    "Microphone access is required. Please allow microphone access and refresh.",
                    Severity::Warning,
                );
            }
        }
    }

    pub async fn is_recording(&self) -> bool {
        self.session.lock().await.is_armed()
    }

    // ------------------------------------------------------------------
    // Recording lifecycle
    // ------------------------------------------------------------------

    /// Arm the session and start capturing for the given context.
    ///
    /// `AlreadyArmed` while a recording is in progress is a caller error,
    /// rejected without side effects; capture-device failures are also
    /// surfaced as a notification.
    pub async fn start_recording(&self, context: RecordingContext) -> Result<(), CoachError> {
        if self.session.lock().await.is_armed() {
            return Err(CoachError::AlreadyArmed);
        }

        let mut rx = {
            let mut capture = self.capture.lock().await;
            match capture.start().await {
                Ok(rx) => rx,
                Err(e) => {
                    error!("Failed to start recording: {e}");
                    self.notifier.publish(
                        "Failed to start recording. Check microphone permissions.",
                        Severity::Error,
                    );
                    return Err(e);
                }
            }
        };

        if let Err(e) = self.session.lock().await.arm(context) {
            // Lost the race for the session; release the device again.
            let _ = self.capture.lock().await.stop().await;
            return Err(e);
        }

        // Fragments flow through one channel, so arrival order is the
        // append order.
        let session = Arc::clone(&self.session);
        let forwarder = tokio::spawn(async move {
            while let Some(fragment) = rx.recv().await {
                if let Err(e) = session.lock().await.append_fragment(fragment) {
                    debug!("Dropping fragment outside armed session: {e}");
                }
            }
        });
        if let Some(old) = self.forwarder.lock().await.replace(forwarder) {
            old.abort();
        }

        let session = Arc::clone(&self.session);
        let renderer = Arc::clone(&self.renderer);
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await;
            loop {
                interval.tick().await;
                let elapsed = session.lock().await.elapsed();
                match elapsed {
                    Some(d) => renderer.recording_tick(&format_elapsed(d.as_secs())),
                    None => break,
                }
            }
        });
        if let Some(old) = self.ticker.lock().await.replace(ticker) {
            old.abort();
        }

        self.renderer.recording_state_changed(true);
        self.notifier
            .publish("Recording started! Speak naturally.", Severity::Success);
        Ok(())
    }

    /// Stop capturing, finalize the session, and dispatch the capture to
    /// whichever workflow was tagged at arm time.
    pub async fn stop_recording(&self) {
        if !self.session.lock().await.is_armed() {
            warn!("Stop requested with no active recording");
            return;
        }

        self.notifier
            .publish("Recording stopped! Processing...", Severity::Info);
        self.renderer.recording_state_changed(false);

        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.abort();
        }

        // Stopping the backend flushes buffered audio and closes the
        // fragment channel; waiting for the forwarder afterwards guarantees
        // every delivered fragment has been appended before finalize.
        if let Err(e) = self.capture.lock().await.stop().await {
            error!("Failed to stop capture: {e}");
        }
        if let Some(forwarder) = self.forwarder.lock().await.take() {
            if let Err(e) = forwarder.await {
                error!("Fragment forwarder panicked: {e}");
            }
        }

        let finalized = self.session.lock().await.finalize();
        match finalized {
            Ok(capture) => {
                if matches!(capture.context, RecordingContext::Assessment(_)) {
                    self.submit_assessment_capture(capture).await;
                } else {
                    self.submit_practice_capture(capture).await;
                }
            }
            Err(CoachError::NoAudioCaptured) => {
                self.notifier
                    .publish("No audio recorded. Please try again.", Severity::Error);
            }
            Err(e) => warn!("Finalize failed: {e}"),
        }
    }

    /// Abandon any recording in progress: device released, fragments
    /// dropped, no capture or error event emitted.
    pub async fn reset_recording(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.abort();
        }
        if let Err(e) = self.capture.lock().await.stop().await {
            error!("Failed to stop capture on reset: {e}");
        }
        if let Some(forwarder) = self.forwarder.lock().await.take() {
            forwarder.abort();
        }
        self.session.lock().await.reset();
        self.renderer.recording_state_changed(false);
        self.renderer.clear_assessment_results();
    }

    // ------------------------------------------------------------------
    // Assessment workflow
    // ------------------------------------------------------------------

    /// Open the recording screen for an assessment selection.
    pub async fn select_assessment(&self, context: AssessmentContext) {
        info!("Starting {} assessment", context.wire_type());
        self.renderer
            .show_recording_screen(&context.title(), &context.instructions());
        self.reset_recording().await;

        let message = match context.kind {
            AssessmentKind::Topic => format!(
                "Topic assessment ready! Talk about {}.",
                context.topic_or_default().to_lowercase()
            ),
            _ => format!("{} ready! Click the microphone to start.", context.title()),
        };
        self.notifier.publish(message, Severity::Success);
    }

    /// Send a finalized assessment capture for analysis and render the
    /// transcription plus the full breakdown when present.
    pub async fn submit_assessment_capture(&self, capture: FinishedCapture) {
        let assessment_type = match &capture.context {
            RecordingContext::Assessment(ctx) => ctx.wire_type(),
            RecordingContext::Practice => "general",
        };

        self.renderer.loading_started("Analyzing your speech...");
        let outcome = self.analyze(&capture.blob, assessment_type).await;
        self.renderer.loading_finished();

        if !self.generation_current(capture.generation).await {
            info!(
                generation = capture.generation,
                "Discarding superseded assessment response"
            );
            return;
        }

        match outcome {
            Ok(resp) => {
                self.renderer
                    .show_transcription(resp.transcription.as_deref().unwrap_or_default());
                if let Some(analysis) = &resp.analysis {
                    self.renderer.show_analysis(&AnalysisReport::from(analysis));
                }
                self.notifier
                    .publish("Speech analysis complete!", Severity::Success);
            }
            Err(e) => self.report_failure(
                e,
                "Failed to analyze speech. Check connection and try again.",
            ),
        }
    }

    /// Clear the assessment flow back to the type-selection state.
    pub async fn reset_assessment(&self) {
        self.reset_recording().await;
        self.notifier
            .publish("Assessment reset. Choose a new test type.", Severity::Info);
    }

    async fn analyze(
        &self,
        blob: &[u8],
        assessment_type: &str,
    ) -> Result<crate::api::AnalyzeResponse, CoachError> {
        let wav = wav::wrap_pcm(
            blob,
            self.capture_config.sample_rate,
            self.capture_config.channels,
        )?;
        let resp = self.api.analyze_speech(wav, assessment_type).await?;
        if !resp.success {
            return Err(CoachError::server_failure(
                resp.error.clone(),
                "Analysis failed. Please try again.",
            ));
        }
        Ok(resp)
    }

    // ------------------------------------------------------------------
    // Practice workflow
    // ------------------------------------------------------------------

    /// Select a practice category and immediately fetch its first prompt.
    pub async fn select_practice(
        &self,
        kind: PracticeKind,
        level: impl Into<String>,
        topic: impl Into<String>,
    ) {
        info!("Selected practice type: {kind}");
        *self.practice.lock().await = Some(PracticeContext::new(kind, level, topic));
        self.renderer.show_practice_selected(kind.display_name());
        self.notifier.publish(
            format!(
                "{} selected! Loading your personalized challenge...",
                kind.display_name()
            ),
            Severity::Success,
        );
        self.request_practice_prompt().await;
    }

    /// Update the free-form level/topic inputs; they are re-read at every
    /// prompt/coaching dispatch.
    pub async fn set_practice_selection(&self, level: impl Into<String>, topic: impl Into<String>) {
        if let Some(practice) = self.practice.lock().await.as_mut() {
            practice.level = level.into();
            practice.topic = topic.into();
        }
    }

    /// Fetch a fresh practice prompt. On success the displayed prompt is
    /// replaced and stale transcription/coaching display is cleared; on
    /// failure the previous prompt stays up.
    pub async fn request_practice_prompt(&self) {
        let Some((kind, level, topic)) = self.practice_selection().await else {
            return;
        };

        self.renderer.loading_started("Generating practice prompt...");
        let outcome = self.fetch_prompt(kind, &level, &topic).await;
        self.renderer.loading_finished();

        match outcome {
            Ok(prompt) => {
                let mut practice = self.practice.lock().await;
                match practice.as_mut() {
                    Some(p) if p.kind == kind => {
                        p.current_prompt = Some(prompt.clone());
                        drop(practice);
                        self.renderer.show_prompt(&prompt);
                        self.renderer.clear_practice_results();
                        self.renderer.clear_coaching();
                    }
                    _ => info!("Discarding prompt for superseded practice selection"),
                }
            }
            Err(e) => self.report_failure(e, "Failed to generate practice prompt"),
        }
    }

    /// Send a finalized practice capture for transcription.
    pub async fn submit_practice_capture(&self, capture: FinishedCapture) {
        self.renderer.loading_started("Transcribing your speech...");
        let outcome = self.transcribe(&capture.blob).await;
        self.renderer.loading_finished();

        if !self.generation_current(capture.generation).await {
            info!(
                generation = capture.generation,
                "Discarding superseded transcription response"
            );
            return;
        }

        match outcome {
            Ok(text) => {
                if let Some(practice) = self.practice.lock().await.as_mut() {
                    practice.last_transcription = Some(text.clone());
                }
                self.renderer.show_practice_transcription(&text);
                self.renderer.clear_coaching();
            }
            Err(e) => self.report_failure(e, "Failed to transcribe audio"),
        }
    }

    /// Request coaching feedback on the last transcription. Fails locally
    /// with `NoTranscriptionAvailable`, without contacting the service,
    /// when nothing has been transcribed yet.
    pub async fn request_coaching(&self) {
        let snapshot = {
            let practice = self.practice.lock().await;
            practice.as_ref().map(|p| {
                (
                    p.kind,
                    p.level.clone(),
                    p.topic.clone(),
                    p.last_transcription.clone().unwrap_or_default(),
                )
            })
        };

        let Some((kind, level, topic, input)) = snapshot else {
            self.report_failure(
                CoachError::NoTranscriptionAvailable,
                "Failed to get coaching feedback",
            );
            return;
        };
        if input.trim().is_empty() {
            self.report_failure(
                CoachError::NoTranscriptionAvailable,
                "Failed to get coaching feedback",
            );
            return;
        }

        self.renderer
            .loading_started("Getting personalized coaching...");
        let outcome = self.fetch_coaching(kind, &level, &topic, &input).await;
        self.renderer.loading_finished();

        match outcome {
            Ok(coaching) => {
                let current_kind = self.practice.lock().await.as_ref().map(|p| p.kind);
                if current_kind == Some(kind) {
                    self.renderer.show_coaching(&CoachingReport::from(&coaching));
                } else {
                    info!("Discarding coaching for superseded practice selection");
                }
            }
            Err(e) => self.report_failure(e, "Failed to get coaching feedback"),
        }
    }

    /// Fetch another prompt for the current category.
    pub async fn continue_practice(&self) {
        self.request_practice_prompt().await;
    }

    /// Drop the practice context entirely; the user is back at category
    /// selection.
    pub async fn change_practice_type(&self) {
        *self.practice.lock().await = None;
        self.renderer.practice_cleared();
    }

    /// The transcription that would feed the next coaching request.
    pub async fn last_transcription(&self) -> Option<String> {
        self.practice
            .lock()
            .await
            .as_ref()
            .and_then(|p| p.last_transcription.clone())
    }

    async fn practice_selection(&self) -> Option<(PracticeKind, String, String)> {
        self.practice
            .lock()
            .await
            .as_ref()
            .map(|p| (p.kind, p.level.clone(), p.topic.clone()))
    }

    async fn fetch_prompt(
        &self,
        kind: PracticeKind,
        level: &str,
        topic: &str,
    ) -> Result<PracticePrompt, CoachError> {
        let resp = self
            .api
            .practice_prompt(PromptRequest {
                kind: kind.wire_name().to_string(),
                topic: topic.to_string(),
                level: level.to_string(),
            })
            .await?;
        if !resp.success {
            return Err(CoachError::server_failure(
                resp.error,
                "Failed to generate prompt",
            ));
        }
        resp.prompt
            .ok_or_else(|| CoachError::MalformedResponse("missing prompt".to_string()))
    }

    async fn transcribe(&self, blob: &[u8]) -> Result<String, CoachError> {
        let wav = wav::wrap_pcm(
            blob,
            self.capture_config.sample_rate,
            self.capture_config.channels,
        )?;
        let resp = self.api.transcribe_audio(wav).await?;
        if !resp.success {
            return Err(CoachError::server_failure(
                resp.error,
                "Transcription failed",
            ));
        }
        Ok(resp.transcription.unwrap_or_default())
    }

    async fn fetch_coaching(
        &self,
        kind: PracticeKind,
        level: &str,
        topic: &str,
        input: &str,
    ) -> Result<crate::api::Coaching, CoachError> {
        let resp = self
            .api
            .practice_session(CoachingRequest {
                kind: kind.wire_name().to_string(),
                topic: topic.to_string(),
                input: input.to_string(),
                level: level.to_string(),
            })
            .await?;
        if !resp.success {
            return Err(CoachError::server_failure(resp.error, "Coaching failed"));
        }
        resp.coaching
            .ok_or_else(|| CoachError::MalformedResponse("missing coaching".to_string()))
    }

    // ------------------------------------------------------------------
    // Shared failure path
    // ------------------------------------------------------------------

    /// True when no re-arm happened since the capture was taken; stale
    /// responses are discarded instead of overwriting current display.
    async fn generation_current(&self, generation: u64) -> bool {
        self.session.lock().await.generation() == generation
    }

    /// Convert any operation failure into exactly one notification. The
    /// server-supplied error string wins over the transport fallback.
    fn report_failure(&self, err: CoachError, transport_fallback: &str) {
        error!("Operation failed: {err}");
        let message = match &err {
            CoachError::ServerReportedFailure(msg) => msg.clone(),
            CoachError::NoTranscriptionAvailable => "No transcription available".to_string(),
            CoachError::NoAudioCaptured => "No audio recorded. Please try again.".to_string(),
            _ => transport_fallback.to_string(),
        };
        self.notifier.publish(message, Severity::Error);
    }
}
