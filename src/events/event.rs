//! # Lifecycle events emitted by the scheduler and the photo.
//!
//! [`EventKind`] classifies events in two groups:
//! - **Scheduler events**: per-run execution flow (`RunStarted`, `RunFinished`,
//!   `RunFailed`) plus `Drained` when nothing is pending or in flight.
//! - **Photo events**: `StatusChanged` on every status transition,
//!   `CycleStarted` / `CycleFinished` bracketing one start cycle.
//!
//! Each event carries a globally unique, monotonically increasing sequence
//! number (`seq`); use it to restore order when events are observed from
//! independent receivers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::photo::PhotoStatus;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Scheduler events ===
    /// A run moved into the in-flight slot and its executor was invoked.
    ///
    /// Sets: `run`, `at`, `seq`.
    RunStarted,

    /// The in-flight run's executor settled successfully.
    ///
    /// Sets: `run`, `at`, `seq`.
    RunFinished,

    /// The in-flight run failed: executor error, timeout, or cancellation
    /// acknowledgment. The `reason` distinguishes them textually; run state
    /// resolution uses the run's own cancellation flag.
    ///
    /// Sets: `run`, `reason`, `timeout_ms` (timeouts only), `at`, `seq`.
    RunFailed,

    /// The pending sequence is empty and nothing is in flight.
    ///
    /// Fires once per drain. Sets: `at`, `seq`.
    Drained,

    // === Photo events ===
    /// The photo's status changed.
    ///
    /// Sets: `from`, `to`, `at`, `seq`.
    StatusChanged,

    /// A cycle was (re)entered: `start()` or `rerun()` was invoked.
    ///
    /// Sets: `at`, `seq`.
    CycleStarted,

    /// The cycle settled into a terminal status. Fires exactly once per
    /// cycle, including the cancellation path.
    ///
    /// Sets: `at`, `seq`.
    CycleFinished,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// 1-based run id, for scheduler events.
    pub run: Option<u32>,
    /// Human-readable failure reason.
    pub reason: Option<Arc<str>>,
    /// Timeout ceiling in milliseconds (compact), for timeout failures.
    pub timeout_ms: Option<u32>,
    /// Previous status, for `StatusChanged`.
    pub from: Option<PhotoStatus>,
    /// New status, for `StatusChanged`.
    pub to: Option<PhotoStatus>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            run: None,
            reason: None,
            timeout_ms: None,
            from: None,
            to: None,
        }
    }

    /// Attaches a run id.
    #[inline]
    pub fn with_run(mut self, id: u32) -> Self {
        self.run = Some(id);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timeout ceiling (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a status transition.
    #[inline]
    pub fn with_transition(mut self, from: PhotoStatus, to: PhotoStatus) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::RunStarted);
        let b = Event::new(EventKind::RunFinished);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_set_metadata() {
        let ev = Event::new(EventKind::RunFailed)
            .with_run(2)
            .with_reason("boom")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(ev.kind, EventKind::RunFailed);
        assert_eq!(ev.run, Some(2));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        assert_eq!(ev.timeout_ms, Some(5000));

        let ev = Event::new(EventKind::StatusChanged)
            .with_transition(PhotoStatus::Pending, PhotoStatus::Running);
        assert_eq!(ev.from, Some(PhotoStatus::Pending));
        assert_eq!(ev.to, Some(PhotoStatus::Running));
    }
}
