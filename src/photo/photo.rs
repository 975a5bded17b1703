//! # Photo: lifecycle owner for one work item.
//!
//! Owns the full set of runs for one processing cycle, derives the per-run
//! timeout policy from preferences and file kind, drives the [`RunQueue`],
//! exposes the status state machine, and folds the scheduler's `Drained`
//! event into a single `CycleFinished` signal per cycle.
//!
//! ## Control flow
//! ```text
//! start():
//!   executions == 0 ──► return (status stays pending)
//!   reset ──► status=running, timer start, CycleStarted
//!         ──► create runs 1..=N, push each into the queue
//!         ──► suspend until CycleFinished
//!
//! forwarder (own task, subscribed to the bus):
//!   RunStarted(id)  ──► run.on_start()
//!   RunFinished(id) ──► run.on_finish()
//!   RunFailed(id)   ──► run.on_fail()      (cancelled vs failed resolved there)
//!   Drained         ──► finish_cycle(finished)
//!
//! finish_cycle(status):           (guarded: once per cycle)
//!   timer stop ──► status=terminal ──► CycleFinished ──► notification policy
//! ```
//!
//! ## Rules
//! - `runs` and `status` are mutated only here, in response to scheduler
//!   events or direct API calls.
//! - Cancellation reports the terminal status immediately; executor shutdown
//!   latency is decoupled from it.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use log::{debug, warn};
use tokio::sync::broadcast;

use crate::config::{DEFAULT_BUS_CAPACITY, Preferences, SETTLE_DELAY};
use crate::error::PhotoError;
use crate::events::{Bus, Event, EventKind};
use crate::executor::ExecutorRef;
use crate::file::PhotoFile;
use crate::notify::{Notification, NotifierRef};
use crate::photo::{PhotoRun, PhotoStatus, Timer};
use crate::queue::RunQueue;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Lifecycle owner for one photo.
///
/// Created once per source file; `runs` and queue contents are recreated on
/// every `start()` (a cycle). Must be constructed inside a Tokio runtime.
pub struct Photo {
    id: String,
    file: PhotoFile,
    preferences: Preferences,
    status: Mutex<PhotoStatus>,
    runs: Mutex<Vec<Arc<PhotoRun>>>,
    timer: Timer,
    bus: Bus,
    queue: RunQueue,
    notifier: Option<NotifierRef>,
    /// True from cycle entry until `CycleFinished` has fired for it.
    cycle_open: AtomicBool,
}

impl Photo {
    /// Creates a photo from an already-validated file.
    ///
    /// The per-run timeout ceiling is computed here, once, from the device
    /// class and the file kind, and applies to every run of every cycle.
    pub fn new(
        file: PhotoFile,
        preferences: Preferences,
        executor: ExecutorRef,
        notifier: Option<NotifierRef>,
    ) -> Arc<Self> {
        let bus = Bus::new(DEFAULT_BUS_CAPACITY);
        let max_timeout = preferences.run_timeout(file.kind());
        let queue = RunQueue::new(bus.clone(), executor, max_timeout, SETTLE_DELAY);

        let photo = Arc::new(Self {
            id: file.id().to_string(),
            file,
            preferences,
            status: Mutex::new(PhotoStatus::Pending),
            runs: Mutex::new(Vec::new()),
            timer: Timer::new(),
            bus,
            queue,
            notifier,
            cycle_open: AtomicBool::new(false),
        });

        Self::spawn_forwarder(&photo);
        photo
    }

    /// Opens, validates, and wraps a file in one step.
    ///
    /// # Errors
    /// Validation errors from [`PhotoFile::open`]: missing file or
    /// unsupported kind.
    pub fn open(
        path: impl Into<std::path::PathBuf>,
        preferences: Preferences,
        executor: ExecutorRef,
        notifier: Option<NotifierRef>,
    ) -> Result<Arc<Self>, PhotoError> {
        let file = PhotoFile::open(path)?;
        Ok(Self::new(file, preferences, executor, notifier))
    }

    /// Stable content-derived identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The validated input file.
    pub fn file(&self) -> &PhotoFile {
        &self.file
    }

    /// The configuration snapshot captured at construction.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Current lifecycle status.
    pub fn status(&self) -> PhotoStatus {
        *lock(&self.status)
    }

    /// Elapsed-duration tracker for the current/last cycle.
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Snapshot of the current cycle's runs, in id order.
    pub fn runs(&self) -> Vec<Arc<PhotoRun>> {
        lock(&self.runs).clone()
    }

    /// Looks up a run of the current cycle by its 1-based id.
    pub fn run(&self, id: u32) -> Option<Arc<PhotoRun>> {
        let runs = lock(&self.runs);
        id.checked_sub(1)
            .and_then(|idx| runs.get(idx as usize))
            .cloned()
    }

    /// Subscribes to this photo's lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Attaches subscribers to this photo's event stream.
    ///
    /// Spawns a listener that fans every subsequent event out through a
    /// [`SubscriberSet`]; this is how an outer registry observes
    /// `StatusChanged` instead of being called from inside a status setter.
    pub fn attach(&self, subscribers: Vec<Arc<dyn Subscribe>>) {
        let set = SubscriberSet::new(subscribers);
        let mut rx = self.bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Marks the photo as queued behind other work at a higher level.
    ///
    /// Externally imposed; does not touch run data. Only toggles between
    /// `pending` and `waiting`.
    pub fn set_waiting(&self, waiting: bool) {
        let status = self.status();
        if waiting && status == PhotoStatus::Pending {
            self.set_status(PhotoStatus::Waiting);
        } else if !waiting && status == PhotoStatus::Waiting {
            self.set_status(PhotoStatus::Pending);
        }
    }

    /// Returns the photo to `pending`, discarding the previous cycle's runs.
    pub fn reset(&self) {
        self.queue.clear();
        lock(&self.runs).clear();
        self.timer.reset();
        self.set_status(PhotoStatus::Pending);
    }

    /// Starts a processing cycle and suspends until it finishes.
    ///
    /// Creates `preferences.executions` fresh runs (ids `1..=N`), pushes them
    /// into the queue, and waits for the cycle-finished signal. With zero
    /// executions this resolves immediately and the status stays `pending`.
    pub async fn start(&self) {
        let executions = self.preferences.executions;
        if executions == 0 {
            debug!("photo {}: zero executions, nothing to start", self.id);
            return;
        }

        self.reset();

        // Subscribe before pushing so a fast cycle cannot finish unseen.
        let rx = self.bus.subscribe();
        self.begin_cycle();
        debug!("photo {}: starting {executions} runs", self.id);

        // One atomic batch: the worker must never see a drained queue while
        // part of the cycle is still being enqueued.
        let batch: Vec<Arc<PhotoRun>> = (1..=executions).map(PhotoRun::new).map(Arc::new).collect();
        *lock(&self.runs) = batch.clone();
        self.queue.push_all(batch);

        self.recv_cycle_finished(rx).await;
    }

    /// Suspends until the current cycle finishes.
    ///
    /// Resolves immediately when no cycle is open. This is the re-await
    /// channel for callers that issued [`Photo::rerun`].
    pub async fn wait_cycle_finished(&self) {
        let rx = self.bus.subscribe();
        if !self.cycle_open.load(AtomicOrdering::SeqCst) {
            return;
        }
        self.recv_cycle_finished(rx).await;
    }

    /// Cancels the current cycle, settling the photo as `finished`.
    pub fn cancel(&self) {
        self.cancel_with(PhotoStatus::Finished);
    }

    /// Cancels the current cycle with a caller-specified terminal status.
    ///
    /// Requests cancellation of every run (settled runs are unaffected) and
    /// transitions immediately, without waiting for in-flight executors to
    /// actually stop.
    pub fn cancel_with(&self, status: PhotoStatus) {
        for run in self.runs() {
            self.queue.cancel(&run);
        }
        self.finish_cycle(status);
    }

    /// Requests cancellation of a single run of the current cycle.
    ///
    /// # Errors
    /// [`PhotoError::UnknownRun`] when no such run exists.
    pub fn cancel_run(&self, run_id: u32) -> Result<(), PhotoError> {
        let run = self.run(run_id).ok_or(PhotoError::UnknownRun { id: run_id })?;
        self.queue.cancel(&run);
        Ok(())
    }

    /// Re-executes exactly one run of the current cycle.
    ///
    /// Resets that run to `queued` and re-pushes it; sibling runs are left
    /// untouched. Re-enters `running` and restarts the cycle timer, but does
    /// **not** create a new completion wait — re-await through
    /// [`Photo::wait_cycle_finished`].
    ///
    /// # Errors
    /// [`PhotoError::UnknownRun`] when no such run exists.
    pub fn rerun(&self, run_id: u32) -> Result<(), PhotoError> {
        let run = self.run(run_id).ok_or(PhotoError::UnknownRun { id: run_id })?;
        run.reset();
        // Open the cycle before the push: a fast run could otherwise drain
        // the queue while the completion guard is still closed, and the
        // cycle-finished signal would be lost.
        self.begin_cycle();
        self.queue.push(run);
        Ok(())
    }

    fn begin_cycle(&self) {
        self.cycle_open.store(true, AtomicOrdering::SeqCst);
        self.set_status(PhotoStatus::Running);
        self.timer.start();
        self.bus.publish(Event::new(EventKind::CycleStarted));
    }

    /// Settles the cycle exactly once: stops the timer, applies the terminal
    /// status, fires `CycleFinished`, and applies notification policy.
    fn finish_cycle(&self, status: PhotoStatus) {
        if !self.cycle_open.swap(false, AtomicOrdering::SeqCst) {
            return;
        }
        self.timer.stop();
        self.set_status(status);
        self.bus.publish(Event::new(EventKind::CycleFinished));
        self.send_notification();
    }

    fn set_status(&self, to: PhotoStatus) {
        let from = {
            let mut status = lock(&self.status);
            std::mem::replace(&mut *status, to)
        };
        if from != to {
            self.bus
                .publish(Event::new(EventKind::StatusChanged).with_transition(from, to));
        }
    }

    /// Fire-and-forget notification, gated on the preference flag and the
    /// surface being backgrounded. Notifier errors are logged, never raised.
    fn send_notification(&self) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        if !self.preferences.notify_on_finish || !notifier.is_backgrounded() {
            return;
        }

        let notification = Notification {
            title: "Processing complete".to_string(),
            body: "All runs have finished.".to_string(),
            icon: Some(self.file.path().to_path_buf()),
            action: Some(format!("/photos/{}/results", self.id)),
        };
        let id = self.id.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier.notify(&notification).await {
                warn!("photo {id}: unable to send a notification: {err}");
            }
        });
    }

    async fn recv_cycle_finished(&self, mut rx: broadcast::Receiver<Event>) {
        loop {
            match rx.recv().await {
                Ok(ev) if ev.kind == EventKind::CycleFinished => break,
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    // Fall back to the guard: the event may have been skipped.
                    if !self.cycle_open.load(AtomicOrdering::SeqCst) {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Forwards scheduler events into per-run state updates.
    ///
    /// Holds only a weak handle so a dropped photo tears the task down.
    fn spawn_forwarder(photo: &Arc<Self>) {
        let mut rx = photo.bus.subscribe();
        let weak: Weak<Photo> = Arc::downgrade(photo);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        let Some(photo) = weak.upgrade() else { break };
                        photo.handle_event(&ev);
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    fn handle_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::RunStarted => {
                if let Some(run) = ev.run.and_then(|id| self.run(id)) {
                    debug!("photo {}: run #{} started", self.id, run.id());
                    run.on_start();
                }
            }
            EventKind::RunFinished => {
                if let Some(run) = ev.run.and_then(|id| self.run(id)) {
                    debug!("photo {}: run #{} finished", self.id, run.id());
                    run.on_finish();
                }
            }
            EventKind::RunFailed => {
                if let Some(run) = ev.run.and_then(|id| self.run(id)) {
                    warn!(
                        "photo {}: run #{} failed: {}",
                        self.id,
                        run.id(),
                        ev.reason.as_deref().unwrap_or("unknown error")
                    );
                    run.on_fail();
                }
            }
            EventKind::Drained => {
                debug!("photo {}: all runs finished", self.id);
                self.finish_cycle(PhotoStatus::Finished);
            }
            _ => {}
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceClass;
    use crate::error::RunError;
    use crate::executor::ExecutorFn;
    use crate::notify::{Notifier, NotifierError};
    use crate::photo::RunState;
    use async_trait::async_trait;
    use std::sync::OnceLock;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;
    use tokio::time;
    use tokio_util::sync::CancellationToken;

    fn temp_photo_file(dir: &tempfile::TempDir) -> PhotoFile {
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();
        PhotoFile::open(path).unwrap()
    }

    fn prefs(executions: u32) -> Preferences {
        Preferences {
            executions,
            device: DeviceClass::Fast,
            notify_on_finish: false,
        }
    }

    fn ok_executor() -> ExecutorRef {
        ExecutorFn::arc(|_id, _ctx| async move {
            time::sleep(Duration::from_millis(20)).await;
            Ok(())
        })
    }

    /// Polls until `cond` holds, advancing (paused) time between samples.
    async fn wait_until(mut cond: impl FnMut() -> bool) {
        for _ in 0..1000 {
            if cond() {
                return;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition never became true");
    }

    #[tokio::test(start_paused = true)]
    async fn three_runs_finish_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let photo = Photo::new(temp_photo_file(&dir), prefs(3), ok_executor(), None);

        let mut rx = photo.subscribe();
        photo.start().await;

        assert_eq!(photo.status(), PhotoStatus::Finished);
        let runs = photo.runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(
            runs.iter().map(|r| r.id()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(runs.iter().all(|r| r.state() == RunState::Finished));
        assert!(!photo.timer().is_running());

        // Lifecycle events arrive in id order; completion fires exactly once.
        let mut started = Vec::new();
        let mut cycle_finished = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::RunStarted => started.push(ev.run.unwrap()),
                EventKind::CycleFinished => cycle_finished += 1,
                _ => {}
            }
        }
        assert_eq!(started, vec![1, 2, 3]);
        assert_eq!(cycle_finished, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_executions_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let photo = Photo::new(temp_photo_file(&dir), prefs(0), ok_executor(), None);

        photo.start().await;
        assert_eq!(photo.status(), PhotoStatus::Pending);
        assert!(photo.runs().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn at_most_one_run_is_running() {
        let dir = tempfile::tempdir().unwrap();
        let slot: Arc<OnceLock<Weak<Photo>>> = Arc::new(OnceLock::new());
        let max_running = Arc::new(AtomicU32::new(0));

        let slot2 = Arc::clone(&slot);
        let max2 = Arc::clone(&max_running);
        let executor = ExecutorFn::arc(move |_id, _ctx| {
            let slot = Arc::clone(&slot2);
            let max = Arc::clone(&max2);
            async move {
                if let Some(photo) = slot.get().and_then(Weak::upgrade) {
                    let running = photo
                        .runs()
                        .iter()
                        .filter(|r| r.state() == RunState::Running)
                        .count() as u32;
                    max.fetch_max(running, AtomicOrdering::SeqCst);
                }
                time::sleep(Duration::from_millis(20)).await;
                Ok(())
            }
        });

        let photo = Photo::new(temp_photo_file(&dir), prefs(4), executor, None);
        slot.set(Arc::downgrade(&photo)).unwrap();

        photo.start().await;
        assert!(max_running.load(AtomicOrdering::SeqCst) <= 1);
        assert_eq!(photo.runs().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_settles_every_run_and_applies_status() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ExecutorFn::arc(|_id, ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err(RunError::Canceled)
        });
        let photo = Photo::new(temp_photo_file(&dir), prefs(3), executor, None);

        let handle = {
            let photo = Arc::clone(&photo);
            tokio::spawn(async move { photo.start().await })
        };
        wait_until({
            let photo = Arc::clone(&photo);
            move || !photo.runs().is_empty()
        })
        .await;

        photo.cancel_with(PhotoStatus::Cancelled);
        handle.await.unwrap();

        // Status terminates immediately; executors may still be stopping.
        assert_eq!(photo.status(), PhotoStatus::Cancelled);

        wait_until({
            let photo = Arc::clone(&photo);
            move || photo.runs().iter().all(|r| r.state().is_settled())
        })
        .await;
        for run in photo.runs() {
            assert!(
                matches!(run.state(), RunState::Finished | RunState::Cancelled),
                "run #{} ended as {}",
                run.id(),
                run.state()
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rerun_resets_only_the_given_run() {
        let dir = tempfile::tempdir().unwrap();
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts2 = Arc::clone(&attempts);
        let executor = ExecutorFn::arc(move |id, _ctx| {
            let attempts = Arc::clone(&attempts2);
            async move {
                // Run 2 fails on its first attempt only.
                if id == 2 && attempts.fetch_add(1, AtomicOrdering::SeqCst) == 0 {
                    return Err(RunError::Execution {
                        error: "flaky".into(),
                    });
                }
                Ok(())
            }
        });
        let photo = Photo::new(temp_photo_file(&dir), prefs(3), executor, None);

        photo.start().await;
        assert_eq!(photo.status(), PhotoStatus::Finished);
        assert_eq!(photo.run(2).unwrap().state(), RunState::Failed);
        assert_eq!(photo.run(1).unwrap().state(), RunState::Finished);
        assert_eq!(photo.run(3).unwrap().state(), RunState::Finished);

        photo.rerun(2).unwrap();
        assert_eq!(photo.status(), PhotoStatus::Running);
        photo.wait_cycle_finished().await;

        assert_eq!(photo.status(), PhotoStatus::Finished);
        assert_eq!(photo.run(2).unwrap().state(), RunState::Finished);
        assert_eq!(photo.runs().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rerun_opens_the_cycle_before_the_run_can_start() {
        let dir = tempfile::tempdir().unwrap();
        let photo = Photo::new(temp_photo_file(&dir), prefs(1), ok_executor(), None);
        photo.start().await;

        let mut rx = photo.subscribe();
        photo.rerun(1).unwrap();
        photo.wait_cycle_finished().await;

        // The cycle must be open before the queue can touch the run, or a
        // fast run would drain against a closed completion guard and the
        // finished signal would never fire.
        let mut cycle_started_seq = None;
        let mut run_started_seq = None;
        let mut cycle_finished = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::CycleStarted => cycle_started_seq = Some(ev.seq),
                EventKind::RunStarted => run_started_seq = Some(ev.seq),
                EventKind::CycleFinished => cycle_finished += 1,
                _ => {}
            }
        }
        assert!(cycle_started_seq.unwrap() < run_started_seq.unwrap());
        assert_eq!(cycle_finished, 1);
        assert_eq!(photo.status(), PhotoStatus::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn rerun_of_unknown_run_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let photo = Photo::new(temp_photo_file(&dir), prefs(1), ok_executor(), None);
        photo.start().await;

        let err = photo.rerun(9).unwrap_err();
        assert!(matches!(err, PhotoError::UnknownRun { id: 9 }));
    }

    #[tokio::test(start_paused = true)]
    async fn status_transitions_are_published() {
        let dir = tempfile::tempdir().unwrap();
        let photo = Photo::new(temp_photo_file(&dir), prefs(1), ok_executor(), None);

        let mut rx = photo.subscribe();
        photo.start().await;

        let mut transitions = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::StatusChanged {
                transitions.push((ev.from.unwrap(), ev.to.unwrap()));
            }
        }
        assert_eq!(
            transitions,
            vec![
                (PhotoStatus::Pending, PhotoStatus::Running),
                (PhotoStatus::Running, PhotoStatus::Finished),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waiting_toggles_without_touching_runs() {
        let dir = tempfile::tempdir().unwrap();
        let photo = Photo::new(temp_photo_file(&dir), prefs(2), ok_executor(), None);

        photo.set_waiting(true);
        assert_eq!(photo.status(), PhotoStatus::Waiting);
        assert!(photo.runs().is_empty());
        photo.set_waiting(false);
        assert_eq!(photo.status(), PhotoStatus::Pending);

        // Terminal status is not overridden by waiting toggles.
        photo.start().await;
        photo.set_waiting(true);
        assert_eq!(photo.status(), PhotoStatus::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restores_pending() {
        let dir = tempfile::tempdir().unwrap();
        let photo = Photo::new(temp_photo_file(&dir), prefs(2), ok_executor(), None);

        photo.start().await;
        assert_eq!(photo.status(), PhotoStatus::Finished);

        photo.reset();
        assert_eq!(photo.status(), PhotoStatus::Pending);
        assert!(photo.runs().is_empty());
        assert_eq!(photo.timer().elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn attached_subscribers_observe_the_stream() {
        struct Tally {
            status_changes: Arc<AtomicU32>,
        }

        #[async_trait]
        impl Subscribe for Tally {
            async fn on_event(&self, event: &Event) {
                if event.kind == EventKind::StatusChanged {
                    self.status_changes.fetch_add(1, AtomicOrdering::SeqCst);
                }
            }

            fn name(&self) -> &'static str {
                "tally"
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let photo = Photo::new(temp_photo_file(&dir), prefs(1), ok_executor(), None);
        let status_changes = Arc::new(AtomicU32::new(0));
        photo.attach(vec![Arc::new(Tally {
            status_changes: Arc::clone(&status_changes),
        })]);

        photo.start().await;

        // pending→running and running→finished.
        wait_until({
            let status_changes = Arc::clone(&status_changes);
            move || status_changes.load(AtomicOrdering::SeqCst) == 2
        })
        .await;
    }

    struct FakeNotifier {
        backgrounded: bool,
        sent: Arc<AtomicU32>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        fn is_backgrounded(&self) -> bool {
            self.backgrounded
        }

        async fn notify(&self, _notification: &Notification) -> Result<(), NotifierError> {
            self.sent.fetch_add(1, AtomicOrdering::SeqCst);
            if self.fail {
                return Err(NotifierError::new("no notification daemon"));
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn notifies_when_backgrounded_and_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let sent = Arc::new(AtomicU32::new(0));
        let notifier = Arc::new(FakeNotifier {
            backgrounded: true,
            sent: Arc::clone(&sent),
            fail: false,
        });
        let mut preferences = prefs(1);
        preferences.notify_on_finish = true;

        let photo = Photo::new(
            temp_photo_file(&dir),
            preferences,
            ok_executor(),
            Some(notifier),
        );
        photo.start().await;

        wait_until({
            let sent = Arc::clone(&sent);
            move || sent.load(AtomicOrdering::SeqCst) == 1
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn foregrounded_surface_suppresses_notification() {
        let dir = tempfile::tempdir().unwrap();
        let sent = Arc::new(AtomicU32::new(0));
        let notifier = Arc::new(FakeNotifier {
            backgrounded: false,
            sent: Arc::clone(&sent),
            fail: false,
        });
        let mut preferences = prefs(1);
        preferences.notify_on_finish = true;

        let photo = Photo::new(
            temp_photo_file(&dir),
            preferences,
            ok_executor(),
            Some(notifier),
        );
        photo.start().await;

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(sent.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn notifier_failure_never_breaks_the_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let sent = Arc::new(AtomicU32::new(0));
        let notifier = Arc::new(FakeNotifier {
            backgrounded: true,
            sent: Arc::clone(&sent),
            fail: true,
        });
        let mut preferences = prefs(1);
        preferences.notify_on_finish = true;

        let photo = Photo::new(
            temp_photo_file(&dir),
            preferences,
            ok_executor(),
            Some(notifier),
        );
        photo.start().await;

        assert_eq!(photo.status(), PhotoStatus::Finished);
        wait_until({
            let sent = Arc::clone(&sent);
            move || sent.load(AtomicOrdering::SeqCst) == 1
        })
        .await;
    }
}
