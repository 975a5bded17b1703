//! # One execution attempt of a photo's processing task.
//!
//! [`PhotoRun`] owns its own state and start/cancel contract. The queue
//! invokes the executor with a child token derived from the run's root token
//! ([`PhotoRun::attempt_token`]); cancelling the run cancels every attempt
//! token derived from it.
//!
//! ## Rules
//! - A run never mutates another run's state.
//! - `cancel()` on a queued run settles it as `cancelled` immediately; on an
//!   in-flight run the transition happens when the executor acknowledges the
//!   token (reported through the failed path).
//! - `reset()` re-arms a settled run for rerun: fresh `queued` state, fresh
//!   token, cleared outcome.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::photo::Timer;

/// Execution state of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Pushed into the scheduler, not yet started.
    Queued,
    /// Executor invocation in flight. At most one run per photo is here.
    Running,
    /// Settled: executor produced a result.
    Finished,
    /// Settled: executor error or timeout.
    Failed,
    /// Settled: cancellation was requested and took effect.
    Cancelled,
}

impl RunState {
    /// Whether the run has settled (no further transitions without reset).
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            RunState::Finished | RunState::Failed | RunState::Cancelled
        )
    }

    /// Short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunState::Queued => "queued",
            RunState::Running => "running",
            RunState::Finished => "finished",
            RunState::Failed => "failed",
            RunState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One execution attempt, identified by its 1-based position in the photo's
/// current cycle.
#[derive(Debug)]
pub struct PhotoRun {
    id: u32,
    state: Mutex<RunState>,
    token: Mutex<CancellationToken>,
    cancel_requested: AtomicBool,
    timer: Timer,
}

impl PhotoRun {
    /// Creates a fresh queued run with the given 1-based id.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            state: Mutex::new(RunState::Queued),
            token: Mutex::new(CancellationToken::new()),
            cancel_requested: AtomicBool::new(false),
            timer: Timer::new(),
        }
    }

    /// The 1-based run id, stable within the photo's current cycle.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Current execution state.
    pub fn state(&self) -> RunState {
        *lock(&self.state)
    }

    /// Elapsed-duration tracker for this run's execution.
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Whether cancellation has been requested since the last reset.
    ///
    /// This is how callers distinguish a cancelled run from a truly failed
    /// one: the failed path resolves to `cancelled` iff this flag was set.
    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(AtomicOrdering::SeqCst)
    }

    /// Requests cooperative cancellation.
    ///
    /// Cancels the run's token (and with it any in-flight attempt token). A
    /// queued run settles as `cancelled` immediately; a settled run is
    /// unaffected; an in-flight run settles once its executor acknowledges.
    pub fn cancel(&self) {
        self.cancel_requested.store(true, AtomicOrdering::SeqCst);
        lock(&self.token).cancel();

        let mut state = lock(&self.state);
        if *state == RunState::Queued {
            *state = RunState::Cancelled;
        }
    }

    /// Returns a settled run to a fresh `queued` state for rerun.
    ///
    /// Clears the outcome, the cancellation request, and the timer, and arms
    /// a fresh root token (the previous one may already be cancelled).
    pub fn reset(&self) {
        *lock(&self.state) = RunState::Queued;
        *lock(&self.token) = CancellationToken::new();
        self.cancel_requested.store(false, AtomicOrdering::SeqCst);
        self.timer.reset();
    }

    /// Derives a fresh child token for one executor attempt.
    pub(crate) fn attempt_token(&self) -> CancellationToken {
        lock(&self.token).child_token()
    }

    pub(crate) fn on_start(&self) {
        *lock(&self.state) = RunState::Running;
        self.timer.start();
    }

    pub(crate) fn on_finish(&self) {
        *lock(&self.state) = RunState::Finished;
        self.timer.stop();
    }

    pub(crate) fn on_fail(&self) {
        let mut state = lock(&self.state);
        *state = if self.cancel_requested() {
            RunState::Cancelled
        } else {
            RunState::Failed
        };
        drop(state);
        self.timer.stop();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
