//! # Desktop notification collaborator.
//!
//! [`Notifier`] is the boundary to whatever delivers desktop notifications.
//! It is pure policy from the core's point of view: fire-and-forget, consulted
//! only when a cycle finishes, and its failures are logged and swallowed —
//! they must never abort the cycle-finished signal.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Error raised by a notifier implementation.
///
/// Logged by the core and never propagated further.
#[derive(Error, Debug)]
#[error("notification delivery failed: {message}")]
pub struct NotifierError {
    /// Human-readable delivery failure.
    pub message: String,
}

impl NotifierError {
    /// Creates a new notifier error from any printable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Payload handed to the notifier when a cycle finishes.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Title line.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Optional icon reference (the photo's file path).
    pub icon: Option<PathBuf>,
    /// Optional action route to open when the notification is clicked.
    pub action: Option<String>,
}

/// Shared handle to a notifier.
pub type NotifierRef = Arc<dyn Notifier>;

/// Contract for the notification collaborator.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Whether the consuming surface is currently backgrounded (e.g. the
    /// window is minimized). Notifications are only sent when it is.
    fn is_backgrounded(&self) -> bool;

    /// Delivers one notification. Failures are logged by the caller and
    /// never affect the cycle outcome.
    async fn notify(&self, notification: &Notification) -> Result<(), NotifierError>;
}
