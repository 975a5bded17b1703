//! Error types used by the photoflow core.
//!
//! This module defines two main error enums:
//!
//! - [`PhotoError`] — construction-time and API errors surfaced to the caller.
//! - [`RunError`] — errors raised by individual run executions.
//!
//! Run-level errors never propagate out of the scheduler; they are converted
//! into run state transitions. Only [`PhotoError`] reaches the photo's creator.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// # Errors surfaced directly to the caller.
///
/// Construction fails when the input file is missing or of an unsupported
/// kind; API calls fail when they reference a run that does not exist in the
/// current cycle.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PhotoError {
    /// The input file does not exist on disk.
    #[error("upload failed: the file \"{path}\" does not exist")]
    Missing {
        /// Path that was checked.
        path: PathBuf,
    },

    /// The input file is not one of the supported image kinds.
    #[error("upload failed: the file \"{path}\" is not a valid photo, only jpeg, png or gif")]
    Unsupported {
        /// Path of the rejected file.
        path: PathBuf,
    },

    /// Reading the file contents failed.
    #[error("failed to read photo file: {0}")]
    Io(#[from] std::io::Error),

    /// The referenced run id is not part of the current cycle.
    #[error("no run with id {id} in the current cycle")]
    UnknownRun {
        /// The 1-based run id that was requested.
        id: u32,
    },
}

impl PhotoError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PhotoError::Missing { .. } => "photo_missing",
            PhotoError::Unsupported { .. } => "photo_unsupported",
            PhotoError::Io(_) => "photo_io",
            PhotoError::UnknownRun { .. } => "photo_unknown_run",
        }
    }
}

/// # Errors produced by run execution.
///
/// These represent failures of a single processing run. The scheduler
/// contains them: a failed run is marked failed and the queue proceeds.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum RunError {
    /// Run execution exceeded its timeout ceiling.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The ceiling that was exceeded.
        timeout: Duration,
    },

    /// The external executor raised an error.
    #[error("execution failed: {error}")]
    Execution {
        /// The underlying error message.
        error: String,
    },

    /// The run was cancelled cooperatively.
    ///
    /// Not a true failure: callers distinguish it from [`RunError::Execution`]
    /// by the cancellation request having preceded the run's settlement.
    #[error("run cancelled")]
    Canceled,
}

impl RunError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunError::Timeout { .. } => "run_timeout",
            RunError::Execution { .. } => "run_failed",
            RunError::Canceled => "run_canceled",
        }
    }

    /// Whether this error was produced by the scheduler's timeout ceiling.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RunError::Timeout { .. })
    }

    /// Whether this error is a cancellation acknowledgment.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RunError::Canceled)
    }
}
