//! # Elapsed-duration tracker for start/stop cycles.
//!
//! [`Timer`] measures the wall-clock duration of one cycle. It has interior
//! mutability so it can be read while a measurement is in progress; all
//! methods are cheap and non-blocking.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    started_at: Option<Instant>,
    elapsed: Duration,
}

/// Wall-clock elapsed-duration tracker.
///
/// `start()` begins a fresh measurement, `stop()` freezes it, `elapsed()`
/// reads either the live or the frozen value.
#[derive(Debug, Default)]
pub struct Timer {
    inner: Mutex<Inner>,
}

impl Timer {
    /// Creates a stopped timer with zero elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the measurement, discarding any previous value.
    pub fn start(&self) {
        let mut inner = self.lock();
        inner.started_at = Some(Instant::now());
        inner.elapsed = Duration::ZERO;
    }

    /// Stops the measurement, freezing the elapsed value. No-op if stopped.
    pub fn stop(&self) {
        let mut inner = self.lock();
        if let Some(started_at) = inner.started_at.take() {
            inner.elapsed = started_at.elapsed();
        }
    }

    /// Returns the timer to its initial stopped, zeroed state.
    pub fn reset(&self) {
        *self.lock() = Inner::default();
    }

    /// Elapsed duration: live while running, frozen after `stop()`.
    pub fn elapsed(&self) -> Duration {
        let inner = self.lock();
        match inner.started_at {
            Some(started_at) => started_at.elapsed(),
            None => inner.elapsed,
        }
    }

    /// Whether a measurement is in progress.
    pub fn is_running(&self) -> bool {
        self.lock().started_at.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
