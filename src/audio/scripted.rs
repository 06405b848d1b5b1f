//! Scripted capture backend for tests and offline runs.

use tokio::sync::mpsc;
use tracing::debug;

use super::backend::{CaptureBackend, CaptureConfig};
use crate::error::CoachError;

/// A capture backend that plays back a fixed fragment script.
///
/// All scripted fragments are delivered immediately on `start`; the channel
/// stays open (as if the microphone were still armed) until `stop` drops
/// the sender. Zero-length entries in the script are skipped, matching the
/// adapter contract that only fragments of size > 0 are delivered.
pub struct ScriptedBackend {
    config: CaptureConfig,
    fragments: Vec<Vec<u8>>,
    deny_permission: bool,
    tx: Option<mpsc::Sender<Vec<u8>>>,
}

impl ScriptedBackend {
    pub fn new(fragments: Vec<Vec<u8>>) -> Self {
        Self {
            config: CaptureConfig::default(),
            fragments,
            deny_permission: false,
            tx: None,
        }
    }

    pub fn with_config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    /// Make `open` fail as if the user declined microphone access.
    pub fn deny_permission(mut self) -> Self {
        self.deny_permission = true;
        self
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl CaptureBackend for ScriptedBackend {
    async fn open(&mut self) -> Result<(), CoachError> {
        if self.deny_permission {
            return Err(CoachError::PermissionDenied(
                "scripted permission denial".to_string(),
            ));
        }
        Ok(())
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<Vec<u8>>, CoachError> {
        if self.tx.is_some() {
            return Err(CoachError::Capture("capture already running".to_string()));
        }

        let (tx, rx) = mpsc::channel(self.fragments.len().max(1) + 1);
        for fragment in &self.fragments {
            if fragment.is_empty() {
                debug!("Skipping empty scripted fragment");
                continue;
            }
            tx.send(fragment.clone())
                .await
                .map_err(|_| CoachError::Capture("fragment receiver closed".to_string()))?;
        }

        self.tx = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CoachError> {
        // Dropping the sender closes the channel; redundant stop is a no-op.
        self.tx = None;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.tx.is_some()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
