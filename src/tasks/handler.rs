//! # Job handler abstraction and function-backed implementation.
//!
//! This module defines the [`JobHandler`] trait (async, one invocation per
//! delivered job) and a convenient closure-backed implementation
//! [`JobFn`]. The common handle type is [`HandlerRef`], an
//! `Arc<dyn JobHandler>` suitable for sharing across worker launches.
//!
//! A handler receives a clone of the owning broker handle alongside the
//! job, so a failure boundary layered around it can disconnect the
//! connection before an error propagates.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::broker::{HandleRef, Job};
use crate::error::JobError;

/// Shared handle to a job handler.
pub type HandlerRef = Arc<dyn JobHandler>;

/// # One callback invoked per matching job.
///
/// `worker` is the broker handle that delivered the job; handlers rarely
/// touch it, but the failure boundary uses it to force a disconnect.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use gearpool::{HandleRef, Job, JobError, JobHandler};
///
/// struct Reverse;
///
/// #[async_trait]
/// impl JobHandler for Reverse {
///     async fn call(&self, _worker: HandleRef, job: Job) -> Result<Vec<u8>, JobError> {
///         let mut out = job.payload;
///         out.reverse();
///         Ok(out)
///     }
/// }
/// ```
#[async_trait]
pub trait JobHandler: Send + Sync + 'static {
    /// Executes one job, returning the result payload.
    async fn call(&self, worker: HandleRef, job: Job) -> Result<Vec<u8>, JobError>;
}

/// A handler that also carries its own task name.
///
/// This is the third accepted task-configuration shape: an opaque object
/// exposing the task name and itself as the callable.
pub trait NamedHandler: JobHandler {
    /// Returns the task name this handler serves.
    fn task_name(&self) -> &str;
}

/// Closure-backed job handler.
///
/// Wraps a closure that *creates* a new future per job, so there is no
/// shared mutable state between invocations; share state explicitly via
/// `Arc` inside the closure if needed.
pub struct JobFn<F> {
    f: F,
}

impl<F> JobFn<F> {
    /// Creates a new closure-backed handler.
    ///
    /// Prefer [`JobFn::arc`] when you immediately need a [`HandlerRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared [`HandlerRef`].
    ///
    /// # Example
    /// ```
    /// use gearpool::{HandleRef, HandlerRef, Job, JobError, JobFn};
    ///
    /// let echo: HandlerRef = JobFn::arc(|_worker: HandleRef, job: Job| async move {
    ///     Ok::<_, JobError>(job.payload)
    /// });
    /// ```
    pub fn arc<Fut>(f: F) -> Arc<Self>
    where
        F: Fn(HandleRef, Job) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>, JobError>> + Send + 'static,
    {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> JobHandler for JobFn<F>
where
    F: Fn(HandleRef, Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>, JobError>> + Send + 'static,
{
    async fn call(&self, worker: HandleRef, job: Job) -> Result<Vec<u8>, JobError> {
        (self.f)(worker, job).await
    }
}
