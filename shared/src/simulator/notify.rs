//! Notification callbacks raised by the simulator.
//!
//! Hosts that show transient status messages plug in a `Notifier`; the
//! simulator only reports what happened.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Kind of notification, mirroring the dashboard's toast styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// An operation completed.
    Success,
    /// An operation failed.
    Error,
    /// Neutral status change.
    Info,
    /// Something needs attention.
    Warning,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification style.
    pub kind: NotificationKind,
    /// Human-readable text.
    pub message: String,
}

impl Notification {
    /// Creates a notification.
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Receives simulator notifications.
pub trait Notifier: Send + Sync {
    /// Handles one notification.
    fn notify(&self, notification: Notification);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Forwards notifications to `tracing` at a matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification { kind, message } = notification;
        match kind {
            NotificationKind::Error => tracing::error!(?kind, "{message}"),
            NotificationKind::Warning => tracing::warn!(?kind, "{message}"),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(?kind, "{message}");
            }
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything received so far.
    #[must_use]
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
