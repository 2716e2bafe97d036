//! # gearpool
//!
//! **gearpool** supervises a pool of job-queue workers: it launches them,
//! watches how they die, and relaunches replacements — forever, until an
//! interrupt — while guaranteeing that a job in flight on a failing worker
//! is handed back to the broker instead of silently lost.
//!
//! The broker itself (a Gearman-style job server) is an external
//! collaborator, expressed as the [`Connector`]/[`BrokerHandle`] traits;
//! this crate owns only the supervision protocol around it.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ TaskInput    │   │ TaskInput    │   │ TaskInput    │
//!     │ (descriptor, │   │ (name, fn)   │   │ (named       │
//!     │  guarded)    │   │  pair        │   │  handler)    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  PoolSupervisor (serve_forever)                               │
//! │  - monotonic launch counter → client ids ("w1", "w2", ...)    │
//! │  - completion channel (mpsc, one receiver)                    │
//! │  - liveness reconciliation each cycle                         │
//! │  - SIGINT/SIGTERM → shared CancellationToken                  │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────┐      ┌──────────┐      ┌──────────┐
//!     │ worker 1 │      │ worker 2 │      │ worker N │   (isolated; no
//!     └────┬─────┘      └────┬─────┘      └────┬─────┘    shared state)
//!          │ connect         │                 │
//!          ▼                 ▼                 ▼
//!     broker handle     broker handle     broker handle
//!          │ serve jobs via guarded handlers  │
//!          └───────── Outcome (at most one) ──┴──► completion channel
//! ```
//!
//! ## Lifecycle
//! ```text
//! serve_forever():
//!   Filling    ─ launch workers until the pool holds max_workers entries
//!   Waiting    ─ bounded wait on the completion channel (timeout ≠ error)
//!   Reconciling─ BrokerUnavailable → flat pause; Normal → noteworthy log;
//!                either way: settle, sweep liveness, drop dead entries
//!   (repeat)   ─ back to Filling; replacements get fresh launch indices
//!   ShuttingDown ─ on cancellation: stop launching, log, return;
//!                  workers drain via the shared token
//! ```
//!
//! ## The requeue guarantee
//! Handlers registered through a guarded [`TaskDescriptor`] run inside a
//! failure boundary ([`Guarded`]): when a handler fails, the worker's
//! broker connection is dropped **before** the failure propagates, so the
//! broker observes a dead connection and redelivers the job to another
//! worker. The failing worker then terminates and the supervisor launches
//! a replacement. A worker that crashes outright sends nothing; the
//! supervisor notices its absence on the next liveness sweep.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use gearpool::{
//!     Connector, HandleRef, HandlerRef, Job, JobError, JobFn, PoolConfig,
//!     PoolSupervisor, TaskInput,
//! };
//!
//! async fn run(connector: Arc<dyn Connector>) {
//!     let mut cfg = PoolConfig::new(vec![
//!         "broker-1:4730".into(),
//!         "broker-2:4730".into(),
//!     ]);
//!     cfg.max_workers = 4;
//!     cfg.id_prefix = Some("w".into());
//!
//!     let reverse: HandlerRef = JobFn::arc(|_worker: HandleRef, job: Job| async move {
//!         let mut out = job.payload;
//!         out.reverse();
//!         Ok::<_, JobError>(out)
//!     });
//!
//!     let tasks: Vec<TaskInput> = vec![("reverse", reverse).into()];
//!     PoolSupervisor::new(cfg, connector, tasks).serve_forever().await;
//! }
//! ```

mod broker;
mod codec;
mod config;
mod core;
mod error;
mod outcome;
mod tasks;
mod worker;

// ---- Public re-exports ----

pub use broker::{BrokerHandle, Connector, HandleRef, Job};
pub use codec::{decode, encode, Decimal};
pub use config::PoolConfig;
pub use core::PoolSupervisor;
pub use error::{BrokerError, CodecError, JobError};
pub use outcome::Outcome;
pub use tasks::{Guarded, HandlerRef, JobFn, JobHandler, NamedHandler, TaskDescriptor, TaskInput};
