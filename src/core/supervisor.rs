//! # PoolSupervisor: owns the worker pool and its relaunch loop.
//!
//! The supervisor launches workers until the pool reaches its target size,
//! then cycles between waiting on the completion channel and reconciling
//! the entry set against worker liveness, relaunching the difference,
//! forever, until the shared cancellation condition is raised.
//!
//! ## State machine
//! ```text
//! Filling ──(target reached)──► Waiting ──(message | timeout)──► Reconciling
//!    ▲                                                                │
//!    └────────────────────────(liveness sweep done)───────────────────┘
//!
//! any state ──(cancellation)──► ShuttingDown: stop launching, log the
//! interrupt, return; children drain via the shared token, not a kill.
//! ```
//!
//! ## Rules
//! - The launch counter is monotonic and supervisor-owned; a client
//!   identity derived from it is never reused, even after its worker dies.
//! - The completion-channel wait is bounded so the supervisor periodically
//!   re-enters reconciliation even when nothing reported: that is how
//!   crashed workers (which send nothing) get replaced.
//! - `BrokerUnavailable` triggers a flat pause before refilling, to avoid
//!   a hot relaunch loop against a broker that is down. `Normal` is merely
//!   noteworthy; both classes relaunch the same way, via the sweep.
//! - Task list and host list are read-only shared configuration; nothing
//!   mutates them after construction.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::broker::Connector;
use crate::config::{worker_ident, PoolConfig};
use crate::core::reconcile::{reconcile, PoolEntry};
use crate::core::shutdown;
use crate::outcome::{self, Outcome, OutcomeSender};
use crate::tasks::{TaskDescriptor, TaskInput};
use crate::worker::{self, WorkerContext};

/// Supervises a pool of broker workers, replacing them as they die.
pub struct PoolSupervisor {
    cfg: PoolConfig,
    hosts: Arc<Vec<String>>,
    tasks: Arc<Vec<TaskDescriptor>>,
    connector: Arc<dyn Connector>,
    cancel: CancellationToken,
}

impl PoolSupervisor {
    /// Creates a supervisor from configuration, a broker connector, and
    /// the task list.
    ///
    /// Task inputs are normalized once, here; the resulting descriptor
    /// list is shared read-only with every worker launch.
    pub fn new(cfg: PoolConfig, connector: Arc<dyn Connector>, tasks: Vec<TaskInput>) -> Self {
        let hosts = Arc::new(cfg.host_list.clone());
        let tasks: Vec<TaskDescriptor> =
            tasks.into_iter().map(TaskInput::into_descriptor).collect();
        Self {
            cfg,
            hosts,
            tasks: Arc::new(tasks),
            connector,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns the shared cancellation token.
    ///
    /// Cancelling it shuts the pool down gracefully; callers that disable
    /// the default signal handling are responsible for doing so.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the pool until the cancellation condition is raised.
    ///
    /// Never returns in steady state: the pool keeps self-healing through
    /// transient broker outages, job failures, and worker crashes. Returns
    /// (without panicking or erroring) once cancellation is observed.
    pub async fn serve_forever(&self) {
        if self.cfg.use_sighandler {
            self.install_sighandler();
        }

        let (tx, mut rx) = outcome::channel();
        let target = self.cfg.effective_workers();
        let mut entries: Vec<PoolEntry> = Vec::with_capacity(target);
        let mut launch_counter: u64 = 0;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            // Filling: bring the pool back up to target.
            self.fill(&mut entries, &mut launch_counter, &tx, target);

            // Waiting: bounded, so liveness is re-checked even in silence.
            let message = tokio::select! {
                _ = self.cancel.cancelled() => break,
                received = time::timeout(self.cfg.poll_interval, rx.recv()) => {
                    received.ok().flatten()
                }
            };

            // Reconciling.
            match message {
                Some(Outcome::BrokerUnavailable { detail }) => {
                    warn!(detail = %detail, "broker unavailable; pausing before reconnect");
                    if self.pause(self.cfg.reconnect_delay).await {
                        break;
                    }
                }
                Some(Outcome::Normal) => {
                    info!("worker serve loop exited normally (may actually be a problem)");
                }
                None => {}
            }

            // Let just-terminated workers finish winding down, then sweep.
            if self.pause(self.cfg.settle_delay).await {
                break;
            }
            let dropped = reconcile(&mut entries);
            if !dropped.is_empty() && self.cfg.verbose {
                info!(?dropped, live = entries.len(), "removed dead workers");
            }
        }

        // ShuttingDown: logged at error severity for operational
        // visibility, not because it indicates malfunction.
        error!("interrupt received; shutting down worker pool");
        self.cancel.cancel();
    }

    /// Launches workers until the pool holds `target` entries.
    fn fill(
        &self,
        entries: &mut Vec<PoolEntry>,
        launch_counter: &mut u64,
        outcomes: &OutcomeSender,
        target: usize,
    ) {
        while entries.len() < target {
            *launch_counter += 1;
            let launch_index = *launch_counter;
            let client_id = self
                .cfg
                .id_prefix
                .as_deref()
                .map(|prefix| worker_ident(prefix, launch_index));

            let ctx = WorkerContext {
                tasks: Arc::clone(&self.tasks),
                hosts: Arc::clone(&self.hosts),
                connector: Arc::clone(&self.connector),
                outcomes: outcomes.clone(),
                client_id,
                verbose: self.cfg.verbose,
                cancel: self.cancel.child_token(),
            };
            let join = tokio::spawn(worker::run(ctx));
            entries.push(PoolEntry { launch_index, join });

            if self.cfg.verbose {
                info!(
                    launch_index,
                    live = entries.len(),
                    target,
                    "launched worker"
                );
            }
        }
    }

    /// Cancellable pause; returns `true` if cancellation interrupted it.
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => true,
            _ = time::sleep(delay) => false,
        }
    }

    /// Traps SIGINT/SIGTERM into the shared cancellation condition.
    fn install_sighandler(&self) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            match shutdown::wait_for_interrupt().await {
                Ok(()) => cancel.cancel(),
                Err(error) => error!(%error, "failed to register signal handlers"),
            }
        });
    }
}
