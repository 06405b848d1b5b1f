//! Best-effort, auto-expiring notification channel.
//!
//! Transient status messages, independent of session state. Multiple
//! notifications coexist in arrival order; no deduplication, no priority.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Total lifetime of a notification from publish to removal.
const LIFETIME: Duration = Duration::from_secs(5);
/// Leading delay before a notification becomes visible, leaving room for a
/// fade-in transition.
const VISIBLE_AFTER: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub visible: bool,
}

/// Handle to the shared notification list.
///
/// `publish` never blocks and never fails; expiry runs on detached tokio
/// timers. Clones share the same list.
#[derive(Clone, Default)]
pub struct Notifier {
    inner: Arc<Mutex<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and schedule its fade-in and removal.
    pub fn publish(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let message = message.into();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        info!(severity = severity.as_str(), "Notification: {message}");

        {
            let mut list = match self.inner.lock() {
                Ok(list) => list,
                Err(poisoned) => poisoned.into_inner(),
            };
            list.push(Notification {
                id,
                message,
                severity,
                created_at: Utc::now(),
                visible: false,
            });
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(VISIBLE_AFTER).await;
            if let Ok(mut list) = inner.lock() {
                if let Some(n) = list.iter_mut().find(|n| n.id == id) {
                    n.visible = true;
                }
            }

            tokio::time::sleep(LIFETIME - VISIBLE_AFTER).await;
            match inner.lock() {
                Ok(mut list) => list.retain(|n| n.id != id),
                Err(_) => warn!("Notification list poisoned, skipping expiry"),
            }
        });

        id
    }

    /// Snapshot of the live notifications in arrival order.
    pub fn active(&self) -> Vec<Notification> {
        match self.inner.lock() {
            Ok(list) => list.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
