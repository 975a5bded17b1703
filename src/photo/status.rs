//! # Photo lifecycle status.
//!
//! The status state machine:
//!
//! ```text
//! pending ──start()──► running ──► finished | failed | cancelled
//!    ▲  ▼                               │
//!    │  waiting (externally imposed)    │
//!    └────────────── reset() ◄──────────┘
//! ```
//!
//! `waiting` is entered/exited by the external scheduler that queues photos
//! behind one another; it never touches run data.

use std::fmt;

/// Lifecycle status of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoStatus {
    /// Initial state; also restored by `reset()`.
    Pending,
    /// Queued behind other photos at a higher level (externally imposed).
    Waiting,
    /// A cycle is in progress.
    Running,
    /// Terminal: the cycle completed (also the default cancel status).
    Finished,
    /// Terminal: the cycle was marked failed by the caller.
    Failed,
    /// Terminal: the cycle was cancelled.
    Cancelled,
}

impl PhotoStatus {
    /// Whether this status ends a cycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PhotoStatus::Finished | PhotoStatus::Failed | PhotoStatus::Cancelled
        )
    }

    /// Short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PhotoStatus::Pending => "pending",
            PhotoStatus::Waiting => "waiting",
            PhotoStatus::Running => "running",
            PhotoStatus::Finished => "finished",
            PhotoStatus::Failed => "failed",
            PhotoStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
