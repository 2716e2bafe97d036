//! # Broker client capability.
//!
//! The job broker is an external collaborator: this crate supervises the
//! workers that hold connections to it, but does not implement the wire
//! protocol. The capability is expressed as two trait seams:
//!
//! - [`Connector`] — produces one live connection per worker launch. This
//!   is the pluggable axis for alternate client implementations (a
//!   JSON-decoding client, an in-memory test double, ...).
//! - [`BrokerHandle`] — one live connection, owned exclusively by exactly
//!   one worker: attach an identity, register named handlers, then block
//!   serving jobs until disconnected.
//!
//! ## Rules
//! - A handle is created on worker start and destroyed on worker
//!   termination; it is never shared or migrated between workers.
//! - Registering the same task name twice overwrites the earlier handler
//!   (last wins), matching common broker client semantics.
//! - Failure to reach any configured host must surface as
//!   [`BrokerError::Unavailable`] — it is the one error class the
//!   supervisor treats specially (pause before relaunch).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BrokerError;
use crate::tasks::HandlerRef;

/// Shared handle to one live broker connection.
pub type HandleRef = Arc<dyn BrokerHandle>;

/// One unit of work delivered by the broker for a registered task.
#[derive(Clone, Debug)]
pub struct Job {
    /// Name of the task this job was submitted for.
    pub task: Arc<str>,
    /// Optional broker-assigned unique key for coalescing/deduplication.
    pub unique: Option<String>,
    /// Raw job payload. See [`codec`](crate::codec) for the JSON shim.
    pub payload: Vec<u8>,
}

impl Job {
    /// Creates a job for the given task with a raw payload.
    pub fn new(task: impl Into<Arc<str>>, payload: Vec<u8>) -> Self {
        Self {
            task: task.into(),
            unique: None,
            payload,
        }
    }
}

/// # One live connection to the broker.
///
/// Owned exclusively by one worker. Dispatch happens inside
/// [`serve`](BrokerHandle::serve): the implementation accepts jobs and
/// invokes whichever handler is registered under the job's task name,
/// handing the handler a clone of this handle so a failure boundary can
/// disconnect it.
#[async_trait]
pub trait BrokerHandle: Send + Sync + 'static {
    /// Attaches a client identity visible to the broker.
    async fn set_identity(&self, id: &str) -> Result<(), BrokerError>;

    /// Registers (or replaces) the handler for a task name.
    async fn register(&self, name: &str, handler: HandlerRef) -> Result<(), BrokerError>;

    /// Blocks serving jobs until the connection closes.
    ///
    /// Returns `Ok(())` only if the serve loop exits cleanly; returns the
    /// terminating error otherwise (including a handler failure propagated
    /// through the failure boundary).
    async fn serve(&self) -> Result<(), BrokerError>;

    /// Drops the connection.
    ///
    /// Must cause any in-flight [`serve`](BrokerHandle::serve) to return,
    /// and must leave unacknowledged jobs to the broker's redelivery.
    async fn disconnect(&self);
}

/// # Factory for broker connections.
///
/// One `connect` call per worker launch. Implementations should try every
/// host in order and report [`BrokerError::Unavailable`] only when none
/// accepts a connection.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Establishes a connection against the configured hosts.
    async fn connect(&self, hosts: &[String]) -> Result<HandleRef, BrokerError>;
}
