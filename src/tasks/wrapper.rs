//! # Failure boundary around a job handler.
//!
//! [`Guarded`] wraps a handler so that a failing job takes its worker's
//! broker connection down with it. Disconnecting **before** the failure
//! propagates is the core correctness property of the pool: the broker
//! observes a dropped connection and redelivers the job to another worker,
//! instead of the job being acknowledged as failed and dropped, or retried
//! under ambiguous semantics.
//!
//! After disconnecting, the original error is propagated so the enclosing
//! serve loop also terminates — a worker that failed once does not keep
//! serving in a possibly corrupted state.
//!
//! The boundary is optional per task: a raw handler skips both the
//! disconnect-and-requeue guarantee and the verbose error logging.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::broker::{HandleRef, Job};
use crate::error::JobError;
use crate::tasks::handler::{HandlerRef, JobHandler};

/// Handler wrapper that disconnects the owning broker handle on failure,
/// then propagates the original error.
pub struct Guarded {
    name: Arc<str>,
    inner: HandlerRef,
    verbose: bool,
}

impl Guarded {
    /// Wraps `inner` for the task `name`.
    ///
    /// When `verbose` is set, handler failures are logged at error
    /// severity with the task name before the disconnect.
    pub fn new(name: impl Into<Arc<str>>, inner: HandlerRef, verbose: bool) -> Self {
        Self {
            name: name.into(),
            inner,
            verbose,
        }
    }
}

#[async_trait]
impl JobHandler for Guarded {
    async fn call(&self, worker: HandleRef, job: Job) -> Result<Vec<u8>, JobError> {
        match self.inner.call(worker.clone(), job).await {
            Ok(out) => Ok(out),
            Err(err) => {
                if self.verbose {
                    error!(task = %self.name, error = %err, "job handler failed");
                }
                // Disconnect so this job goes back into the queue.
                worker.disconnect().await;
                Err(err)
            }
        }
    }
}
