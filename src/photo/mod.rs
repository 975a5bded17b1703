//! Work item: the photo, its runs, status machine, and cycle timer.
//!
//! The only orchestrating type is [`Photo`]; see its module for the control
//! flow. Supporting types:
//! - [`PhotoRun`], [`RunState`] — one execution attempt and its state;
//! - [`PhotoStatus`] — the photo's lifecycle status;
//! - [`Timer`] — wall-clock elapsed tracker shared by photo and runs.

#[allow(clippy::module_inception)]
mod photo;
mod run;
mod status;
mod timer;

pub use photo::Photo;
pub use run::{PhotoRun, RunState};
pub use status::PhotoStatus;
pub use timer::Timer;
