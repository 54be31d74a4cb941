//! Transient notification bus.
//!
//! Handlers never return their outcome; they publish it here and the
//! consumer (a toast rail, a test, a logger) subscribes. Backed by a
//! [`tokio::sync::broadcast`] channel, so publishing with no subscribers
//! is not an error.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Notices buffered per subscriber before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

/// One transient message for the user.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Client-generated id so a consumer can dismiss one specific toast.
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Everything the dashboard broadcasts to its consumers.
#[derive(Debug, Clone)]
pub enum Notice {
    Toast(Toast),
    /// The stored token was rejected; the session has already been cleared.
    SessionExpired,
}

/// Fan-out handle for notices. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.toast(ToastLevel::Info, message);
    }

    pub fn session_expired(&self) {
        let _ = self.tx.send(Notice::SessionExpired);
    }

    fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        let toast = Toast {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            at: Utc::now(),
        };
        // Send only fails when nobody is subscribed.
        let _ = self.tx.send(Notice::Toast(toast));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
