//! Error types used by the pool runtime, job handlers, and payload codec.
//!
//! This module defines three error enums:
//!
//! - [`BrokerError`] — failures surfaced by the broker connection (connect,
//!   register, serve).
//! - [`JobError`] — failures raised by individual job handlers.
//! - [`CodecError`] — failures in the JSON payload codec.
//!
//! Errors never cross the worker/supervisor boundary directly: the only
//! cross-boundary channel is the [`Outcome`](crate::Outcome) message plus
//! worker liveness. `as_label()` helpers provide short stable strings for
//! logs and metrics.

use thiserror::Error;

/// # Errors surfaced by a broker connection.
///
/// The supervisor distinguishes exactly one of these for its relaunch
/// policy: [`BrokerError::Unavailable`], meaning no configured host could
/// be reached. Every other serve-loop error terminates the worker without
/// an outcome message and is recovered by liveness reconciliation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BrokerError {
    /// No configured broker host is reachable.
    #[error("no broker host reachable: {detail}")]
    Unavailable {
        /// Connector-supplied detail (addresses tried, last I/O error, ...).
        detail: String,
    },

    /// The connection dropped while serving jobs.
    ///
    /// Also the expected exit when the failure boundary disconnects the
    /// handle after a job failure.
    #[error("broker connection lost: {detail}")]
    ConnectionLost {
        /// Client-supplied detail about the disconnect.
        detail: String,
    },

    /// A job handler failure was propagated out of the serve loop.
    #[error("job handler failed for task {task}: {error}")]
    Job {
        /// Task name whose handler failed.
        task: String,
        /// The underlying handler error message.
        error: String,
    },
}

impl BrokerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use gearpool::BrokerError;
    ///
    /// let err = BrokerError::Unavailable { detail: "tried 2 hosts".into() };
    /// assert_eq!(err.as_label(), "broker_unavailable");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BrokerError::Unavailable { .. } => "broker_unavailable",
            BrokerError::ConnectionLost { .. } => "broker_connection_lost",
            BrokerError::Job { .. } => "broker_job_failed",
        }
    }

    /// Returns `true` if this error means no broker host was reachable.
    ///
    /// The worker uses this to decide between reporting
    /// [`Outcome::BrokerUnavailable`](crate::Outcome::BrokerUnavailable)
    /// and terminating silently.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BrokerError::Unavailable { .. })
    }
}

/// # Error raised by a job handler.
///
/// The Rust analogue of a callback raising during job execution. When the
/// handler is guarded, the failure boundary disconnects the owning broker
/// handle before this error is allowed to propagate, so the broker observes
/// a dropped connection and redelivers the job.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum JobError {
    /// Handler execution failed.
    #[error("{error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl JobError {
    /// Creates a failure from any displayable error.
    pub fn failed(error: impl std::fmt::Display) -> Self {
        JobError::Failed {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Failed { .. } => "job_failed",
        }
    }
}

/// # Errors produced by the JSON payload codec.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CodecError {
    /// Payload was not valid JSON, or a value failed to serialize.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A decimal literal did not parse as a JSON number.
    #[error("not a valid decimal literal: {repr:?}")]
    Decimal {
        /// The rejected input text.
        repr: String,
    },
}

impl CodecError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CodecError::Json(_) => "codec_json",
            CodecError::Decimal { .. } => "codec_decimal",
        }
    }
}
