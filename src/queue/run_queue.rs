//! # RunQueue: single-concurrency, FIFO, timeout-bounded scheduler.
//!
//! Owns the pending sequence and the single in-flight slot, and is the sole
//! arbiter of "who runs now". A dedicated worker task pops runs strictly in
//! push order, invokes the executor with a per-attempt child token, applies
//! the timeout ceiling, and publishes lifecycle events to the [`Bus`].
//!
//! ## Event flow
//! ```text
//! Success:
//!   executor.execute() → Ok(())  → publish RunFinished
//!
//! Failure:
//!   executor.execute() → Err(_)  → publish RunFailed (queue proceeds)
//!
//! Timeout:
//!   ceiling exceeded → cancel attempt token → publish RunFailed (timeout)
//!
//! Drain:
//!   pending empty ∧ nothing in flight → publish Drained (once per drain)
//! ```
//!
//! ## Rules
//! - Concurrency is fixed at 1; runs never reorder or parallelize.
//! - One run's failure never halts the queue.
//! - No automatic retry; retry is the caller's responsibility via `push`.
//! - A settle delay separates the completion of one run from the start of
//!   the next, so external resources can release.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::RunError;
use crate::events::{Bus, Event, EventKind};
use crate::executor::ExecutorRef;
use crate::photo::{PhotoRun, RunState};

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Arc<PhotoRun>>,
    in_flight: Option<u32>,
}

/// Single-concurrency FIFO scheduler for a photo's runs.
///
/// Created once per photo; its worker task lives until the queue is dropped.
/// Must be constructed inside a Tokio runtime.
pub struct RunQueue {
    state: Arc<Mutex<QueueState>>,
    wake: Arc<Notify>,
    shutdown: CancellationToken,
}

impl RunQueue {
    /// Creates a queue and spawns its worker.
    ///
    /// `max_timeout` is the ceiling applied uniformly to every run pushed for
    /// the current cycle; `settle_delay` separates consecutive runs.
    pub fn new(
        bus: Bus,
        executor: ExecutorRef,
        max_timeout: Duration,
        settle_delay: Duration,
    ) -> Self {
        let state = Arc::new(Mutex::new(QueueState::default()));
        let wake = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();

        tokio::spawn(worker(
            Arc::clone(&state),
            Arc::clone(&wake),
            shutdown.clone(),
            bus,
            executor,
            max_timeout,
            settle_delay,
        ));

        Self {
            state,
            wake,
            shutdown,
        }
    }

    /// Enqueues a run for later execution (strict FIFO).
    pub fn push(&self, run: Arc<PhotoRun>) {
        lock(&self.state).pending.push_back(run);
        self.wake.notify_one();
    }

    /// Enqueues a whole batch of runs under one lock (strict FIFO).
    ///
    /// The worker cannot observe a partially appended batch, so a drain is
    /// only ever reported after the last run of the batch has settled.
    pub fn push_all(&self, runs: impl IntoIterator<Item = Arc<PhotoRun>>) {
        lock(&self.state).pending.extend(runs);
        self.wake.notify_one();
    }

    /// Requests cooperative cancellation of a specific run.
    ///
    /// A queued run is removed from the pending sequence and settles as
    /// cancelled immediately; an in-flight run has its token cancelled and
    /// settles when the executor acknowledges. A settled run is unaffected.
    pub fn cancel(&self, run: &PhotoRun) {
        lock(&self.state).pending.retain(|r| r.id() != run.id());
        if !run.state().is_settled() {
            run.cancel();
        }
    }

    /// Drops any still-pending runs without cancelling the in-flight one.
    pub fn clear(&self) {
        lock(&self.state).pending.clear();
    }

    /// Id of the run currently in flight, if any.
    pub fn in_flight(&self) -> Option<u32> {
        lock(&self.state).in_flight
    }

    /// Number of runs awaiting execution.
    pub fn pending_len(&self) -> usize {
        lock(&self.state).pending.len()
    }

    /// Whether nothing is pending or in flight.
    pub fn is_idle(&self) -> bool {
        let state = lock(&self.state);
        state.pending.is_empty() && state.in_flight.is_none()
    }
}

impl Drop for RunQueue {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Worker loop: pops runs in FIFO order and drives them to settlement.
async fn worker(
    state: Arc<Mutex<QueueState>>,
    wake: Arc<Notify>,
    shutdown: CancellationToken,
    bus: Bus,
    executor: ExecutorRef,
    max_timeout: Duration,
    settle_delay: Duration,
) {
    loop {
        let next = {
            let mut st = lock(&state);
            let run = st.pending.pop_front();
            if let Some(run) = &run {
                st.in_flight = Some(run.id());
            }
            run
        };

        let Some(run) = next else {
            tokio::select! {
                _ = wake.notified() => continue,
                _ = shutdown.cancelled() => break,
            }
        };

        // A run cancelled between push and pop has already settled; skip it.
        if run.state() != RunState::Queued {
            lock(&state).in_flight = None;
            publish_drained_if_idle(&state, &bus);
            continue;
        }

        bus.publish(Event::new(EventKind::RunStarted).with_run(run.id()));

        let token = run.attempt_token();
        let res = match time::timeout(max_timeout, executor.execute(&run, token.clone())).await {
            Ok(res) => res,
            Err(_elapsed) => {
                token.cancel();
                Err(RunError::Timeout {
                    timeout: max_timeout,
                })
            }
        };

        lock(&state).in_flight = None;

        match res {
            Ok(()) => {
                bus.publish(Event::new(EventKind::RunFinished).with_run(run.id()));
            }
            Err(err) => {
                let mut ev = Event::new(EventKind::RunFailed)
                    .with_run(run.id())
                    .with_reason(err.to_string());
                if let RunError::Timeout { timeout } = &err {
                    ev = ev.with_timeout(*timeout);
                }
                bus.publish(ev);
            }
        }

        publish_drained_if_idle(&state, &bus);

        tokio::select! {
            _ = time::sleep(settle_delay) => {}
            _ = shutdown.cancelled() => break,
        }
    }
}

fn publish_drained_if_idle(state: &Mutex<QueueState>, bus: &Bus) {
    let idle = {
        let st = lock(state);
        st.pending.is_empty() && st.in_flight.is_none()
    };
    if idle {
        bus.publish(Event::new(EventKind::Drained));
    }
}

fn lock(state: &Mutex<QueueState>) -> std::sync::MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
