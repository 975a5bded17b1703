//! # LogWriter — event-to-log subscriber.
//!
//! A minimal subscriber that writes incoming [`Event`]s through the `log`
//! facade. Useful as the default observability hook and in demos.
//!
//! ## Example output
//! ```text
//! [run-started] run=1
//! [run-failed] run=2 reason="execution failed: engine exploded"
//! [drained]
//! [status-changed] from=running to=finished
//! [cycle-finished]
//! ```

use async_trait::async_trait;
use log::{debug, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Log-facade event writer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::RunStarted => {
                debug!("[run-started] run={:?}", e.run);
            }
            EventKind::RunFinished => {
                debug!("[run-finished] run={:?}", e.run);
            }
            EventKind::RunFailed => {
                warn!("[run-failed] run={:?} reason={:?}", e.run, e.reason);
            }
            EventKind::Drained => {
                debug!("[drained]");
            }
            EventKind::StatusChanged => {
                debug!("[status-changed] from={:?} to={:?}", e.from, e.to);
            }
            EventKind::CycleStarted => {
                debug!("[cycle-started]");
            }
            EventKind::CycleFinished => {
                debug!("[cycle-finished]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
