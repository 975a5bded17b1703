//! # photoflow
//!
//! **photoflow** is a per-photo run scheduler: one work item (a photo) is
//! processed by an external, long-running, potentially unreliable executor a
//! configurable number of times, strictly one run at a time, with per-run
//! timeout ceilings, cooperative cancellation, selective rerun, and a
//! completion signal that fires exactly once per cycle.
//!
//! ## Architecture
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            │  Photo (lifecycle owner)                     │
//!            │  - status state machine                      │
//!            │  - runs (1..=N per cycle)                    │
//!            │  - cycle timer + completion aggregation      │
//!            └───────┬───────────────────────────▲──────────┘
//!                    │ push / cancel             │ forwarder
//!                    ▼                           │ (events → run states)
//!            ┌──────────────┐   publish   ┌──────┴───────┐
//!            │   RunQueue   ├────────────►│     Bus      │
//!            │ (FIFO, c=1,  │             │ (broadcast)  │
//!            │  timeout)    │             └──────┬───────┘
//!            └──────┬───────┘                    │ fan-out
//!                   │ execute(run, token)        ▼
//!            ┌──────▼───────┐            ┌──────────────┐
//!            │   Executor   │            │ SubscriberSet│
//!            │ (injected)   │            │ (registry,   │
//!            └──────────────┘            │  LogWriter…) │
//!                                        └──────────────┘
//! ```
//!
//! ## Lifecycle
//! ```text
//! Photo::start()
//!   ├─► executions == 0 ─► return (status stays pending)
//!   ├─► reset, status=running, timer start
//!   ├─► create runs 1..=N, push into RunQueue
//!   │
//!   │   RunQueue worker (one run at a time):
//!   │     ├─► publish RunStarted
//!   │     ├─► executor.execute(run, child_token)  [timeout ceiling]
//!   │     ├─► publish RunFinished | RunFailed
//!   │     ├─► settle delay
//!   │     └─► publish Drained when nothing is left
//!   │
//!   └─► suspend until CycleFinished (fires exactly once per cycle)
//! ```
//!
//! ## Features
//! | Area             | Description                                          | Key types / traits            |
//! |------------------|------------------------------------------------------|-------------------------------|
//! | **Lifecycle**    | Status machine, cancellation, rerun, completion.     | [`Photo`], [`PhotoStatus`]    |
//! | **Scheduling**   | FIFO, concurrency 1, timeout-bounded, settle delay.  | [`RunQueue`]                  |
//! | **Runs**         | Per-attempt state, token-based cancellation, reset.  | [`PhotoRun`], [`RunState`]    |
//! | **Executor API** | Injected processing engine, cancellable per attempt. | [`Executor`], [`ExecutorFn`]  |
//! | **Events**       | Broadcast bus plus non-blocking subscriber fan-out.  | [`Bus`], [`Event`], [`Subscribe`] |
//! | **Policy**       | Timeout ceilings, settle delay, notification gating. | [`Preferences`], [`Notifier`] |
//! | **Errors**       | Validation vs contained run-level errors.            | [`PhotoError`], [`RunError`]  |
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use photoflow::{DeviceClass, ExecutorFn, Photo, Preferences, RunError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ExecutorFn::arc(|run_id: u32, ctx: CancellationToken| async move {
//!         // call the inference engine for this run...
//!         if ctx.is_cancelled() {
//!             return Err(RunError::Canceled);
//!         }
//!         tokio::time::sleep(Duration::from_millis(100)).await;
//!         println!("run #{run_id} done");
//!         Ok(())
//!     });
//!
//!     let preferences = Preferences {
//!         executions: 3,
//!         device: DeviceClass::Fast,
//!         notify_on_finish: false,
//!     };
//!
//!     let photo = Photo::open("portrait.png", preferences, engine, None)?;
//!     photo.start().await;
//!     println!("status: {}", photo.status());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod executor;
mod file;
mod notify;
mod photo;
mod queue;
mod subscribers;

// ---- Public re-exports ----

pub use config::{
    ANIMATED_RUN_EXTENSION, DEFAULT_BUS_CAPACITY, DeviceClass, FAST_RUN_TIMEOUT, Preferences,
    SETTLE_DELAY, SLOW_RUN_TIMEOUT,
};
pub use error::{PhotoError, RunError};
pub use events::{Bus, Event, EventKind};
pub use executor::{Executor, ExecutorFn, ExecutorRef};
pub use file::{ImageKind, PhotoFile};
pub use notify::{Notification, Notifier, NotifierError, NotifierRef};
pub use photo::{Photo, PhotoRun, PhotoStatus, RunState, Timer};
pub use queue::RunQueue;
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
