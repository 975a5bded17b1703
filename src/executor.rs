//! # Executor contract and function-backed implementation.
//!
//! The [`Executor`] trait is the seam to the external model-inference engine:
//! asynchronous, cancellable via [`CancellationToken`], and never invoked more
//! than once concurrently per run (the queue's single in-flight slot enforces
//! this). [`ExecutorFn`] wraps a closure, producing a fresh future per
//! invocation; [`ExecutorRef`] is the shared handle type.
//!
//! Implementations should react to the token and return
//! [`RunError::Canceled`](crate::RunError::Canceled) promptly when it fires.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::RunError;
use crate::photo::PhotoRun;

/// Shared handle to an executor.
pub type ExecutorRef = Arc<dyn Executor>;

/// # Asynchronous, cancellable processing engine.
///
/// One `execute` call performs one run. The token is a child token armed for
/// that attempt only; the scheduler cancels it on timeout, and the run cancels
/// it on a cooperative cancellation request.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use photoflow::{Executor, PhotoRun, RunError};
///
/// struct Engine;
///
/// #[async_trait]
/// impl Executor for Engine {
///     async fn execute(&self, run: &PhotoRun, ctx: CancellationToken) -> Result<(), RunError> {
///         if ctx.is_cancelled() {
///             return Err(RunError::Canceled);
///         }
///         // invoke the model for run.id()...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Executes one run until completion, error, or cancellation.
    async fn execute(&self, run: &PhotoRun, ctx: CancellationToken) -> Result<(), RunError>;
}

/// Function-backed executor.
///
/// Wraps a closure that *creates* a new future per invocation, so no state is
/// shared between runs unless the closure captures it explicitly.
#[derive(Debug)]
pub struct ExecutorFn<F> {
    f: F,
}

impl<F, Fut> ExecutorFn<F>
where
    F: Fn(u32, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), RunError>> + Send + 'static,
{
    /// Creates a new function-backed executor.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the executor and returns it as a shared handle.
    ///
    /// # Example
    /// ```
    /// use tokio_util::sync::CancellationToken;
    /// use photoflow::{ExecutorFn, ExecutorRef, RunError};
    ///
    /// let engine: ExecutorRef = ExecutorFn::arc(|_id, _ctx: CancellationToken| async {
    ///     Ok::<_, RunError>(())
    /// });
    /// # let _ = engine;
    /// ```
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Executor for ExecutorFn<F>
where
    F: Fn(u32, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), RunError>> + Send + 'static,
{
    async fn execute(&self, run: &PhotoRun, ctx: CancellationToken) -> Result<(), RunError> {
        (self.f)(run.id(), ctx).await
    }
}
