//! # Preferences snapshot and timeout policy.
//!
//! [`Preferences`] is the resolved configuration captured at photo
//! construction: execution count, compute device class, and the notification
//! flag. It is immutable during a run cycle; the collaborator that supplies
//! settings is responsible for validating values upstream.
//!
//! The per-run timeout ceiling is derived here, once, from the device class
//! and the image kind (see [`Preferences::run_timeout`]).

use std::time::Duration;

use crate::file::ImageKind;

/// Per-run timeout ceiling on a fast compute device.
pub const FAST_RUN_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Per-run timeout ceiling on a slow compute device.
pub const SLOW_RUN_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Fixed extension added to the ceiling for animated kinds, to accommodate
/// per-frame processing.
pub const ANIMATED_RUN_EXTENSION: Duration = Duration::from_secs(30 * 60);

/// Settle delay enforced between completion of one run and the start of the
/// next, letting external resources release.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Default capacity of a photo's event bus ring buffer.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Class of compute device in effect for run execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Fast device (e.g. GPU): short timeout ceiling.
    Fast,
    /// Slow device (e.g. CPU): long timeout ceiling.
    Slow,
}

/// Resolved configuration snapshot for one photo.
///
/// Captured at construction and immutable during a cycle. Malformed values
/// are not validated here; the settings collaborator pre-checks them.
#[derive(Debug, Clone)]
pub struct Preferences {
    /// How many runs one `start()` cycle creates. `0` makes start a no-op.
    pub executions: u32,
    /// Device class affecting the per-run timeout ceiling.
    pub device: DeviceClass,
    /// Whether to send a desktop notification when a cycle finishes while
    /// the consuming surface is backgrounded.
    pub notify_on_finish: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            executions: 1,
            device: DeviceClass::Slow,
            notify_on_finish: false,
        }
    }
}

impl Preferences {
    /// Computes the per-run timeout ceiling for the given image kind.
    ///
    /// Fast device ⇒ [`FAST_RUN_TIMEOUT`]; slow device ⇒ [`SLOW_RUN_TIMEOUT`];
    /// animated kinds add [`ANIMATED_RUN_EXTENSION`] on top of either ceiling.
    /// Applied uniformly to every run pushed for the photo's current cycle.
    pub fn run_timeout(&self, kind: ImageKind) -> Duration {
        let mut timeout = match self.device {
            DeviceClass::Fast => FAST_RUN_TIMEOUT,
            DeviceClass::Slow => SLOW_RUN_TIMEOUT,
        };
        if kind.is_animated() {
            timeout += ANIMATED_RUN_EXTENSION;
        }
        timeout
    }
}
