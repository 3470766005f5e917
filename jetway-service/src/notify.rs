//! The notification surface the controller talks to instead of owning
//! modal/toast mechanics. Fire-and-forget: nothing is returned and the
//! controller never waits on display.

use std::sync::{Mutex, MutexGuard};

/// How prominently a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A "show message" collaborator. Implementations decide whether this
/// becomes a modal, a toast or a log line.
pub trait Notifier: Send + Sync {
    fn show_message(&self, title: &str, body: &str, severity: Severity);
}

/// Notifier that forwards to the tracing subscriber. The default for
/// headless embeddings.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_message(&self, title: &str, body: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!("{}: {}", title, body),
            Severity::Warning => tracing::warn!("{}: {}", title, body),
            Severity::Error => tracing::error!("{}: {}", title, body),
        }
    }
}

/// One captured notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

/// Notifier that records everything it is shown, for assertions in
/// tests and for embeddings that render messages themselves.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages shown so far, oldest first.
    pub fn messages(&self) -> Vec<Notification> {
        self.shown().clone()
    }

    pub fn clear(&self) {
        self.shown().clear();
    }

    fn shown(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn show_message(&self, title: &str, body: &str, severity: Severity) {
        self.shown().push(Notification {
            title: title.to_string(),
            body: body.to_string(),
            severity,
        });
    }
}
