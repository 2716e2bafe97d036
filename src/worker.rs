//! # Worker: one isolated serve loop against the broker.
//!
//! A worker is one independently scheduled execution context owning exactly
//! one broker connection. It shares no mutable state with the supervisor or
//! with sibling workers; the only channels out are the completion channel
//! and its own liveness.
//!
//! ## Lifecycle
//! ```text
//! run(ctx)
//!   ├─► connect(hosts)               ── Unavailable ──► send BrokerUnavailable, exit
//!   ├─► set_identity(client_id)      (if configured)
//!   ├─► register(name, handler)      per descriptor, input order, last wins
//!   ├─► serve()                      blocks dispatching jobs
//!   │     ├─ Ok        ──► send Normal, exit      (unexpected in steady state)
//!   │     ├─ Unavailable ─► send BrokerUnavailable, exit
//!   │     └─ other Err ──► exit silently          (crash path; liveness catches it)
//!   └─ cancellation at any point ──► exit silently, no outcome, no diagnostics
//! ```
//!
//! ## Rules
//! - At most one outcome message per worker lifetime.
//! - No in-process reconnect or re-registration: retry is the supervisor's
//!   job, via relaunch.
//! - The expected shutdown path is quiet; a cancelled worker produces no
//!   output at all.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::broker::Connector;
use crate::error::BrokerError;
use crate::outcome::{Outcome, OutcomeSender};
use crate::tasks::TaskDescriptor;

/// Read-only launch configuration handed to one worker.
///
/// Cloned from supervisor-owned `Arc`s per launch; never mutated after
/// pool construction.
pub(crate) struct WorkerContext {
    /// Normalized task list shared by every worker.
    pub tasks: Arc<Vec<TaskDescriptor>>,
    /// Broker host list shared by every worker.
    pub hosts: Arc<Vec<String>>,
    /// Connection factory (the pluggable client implementation).
    pub connector: Arc<dyn Connector>,
    /// Sender half of the completion channel.
    pub outcomes: OutcomeSender,
    /// Client identity derived from the configured prefix, if any.
    pub client_id: Option<String>,
    /// Gate for registration info logs.
    pub verbose: bool,
    /// Shared cancellation condition, observed at every suspension point.
    pub cancel: CancellationToken,
}

/// Worker entry point: runs the serve loop and classifies its termination.
pub(crate) async fn run(ctx: WorkerContext) {
    let cancel = ctx.cancel.clone();
    tokio::select! {
        // Expected shutdown: exit immediately, send nothing, log nothing.
        _ = cancel.cancelled() => {}
        res = serve(&ctx) => match res {
            Err(BrokerError::Unavailable { detail }) => {
                let _ = ctx.outcomes.send(Outcome::BrokerUnavailable { detail });
            }
            Ok(()) => {
                // Really should never reach this, but report it if we do.
                let _ = ctx.outcomes.send(Outcome::Normal);
            }
            // Handler failure (or disconnect) escaped the serve loop. Stay
            // silent: the supervisor detects this worker by its absence.
            Err(_) => {}
        },
    }
}

/// Connect, register every task, and block serving jobs.
async fn serve(ctx: &WorkerContext) -> Result<(), BrokerError> {
    let handle = ctx.connector.connect(&ctx.hosts).await?;
    if let Some(id) = &ctx.client_id {
        handle.set_identity(id).await?;
    }
    for descriptor in ctx.tasks.iter() {
        if ctx.verbose {
            info!(
                client_id = ctx.client_id.as_deref().unwrap_or("-"),
                task = descriptor.name(),
                "registering task"
            );
        }
        handle
            .register(descriptor.name(), descriptor.bind(ctx.verbose))
            .await?;
    }
    handle.serve().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{BrokerHandle, HandleRef};
    use crate::tasks::{HandlerRef, JobFn, TaskInput};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted serve behavior for one connection.
    #[derive(Clone, Copy)]
    enum ServePlan {
        Clean,
        ConnectionLost,
        Forever,
    }

    struct FakeHandle {
        plan: ServePlan,
        registered: Mutex<Vec<String>>,
        handlers: Mutex<HashMap<String, HandlerRef>>,
        identity: Mutex<Option<String>>,
    }

    impl FakeHandle {
        fn new(plan: ServePlan) -> Arc<Self> {
            Arc::new(Self {
                plan,
                registered: Mutex::new(Vec::new()),
                handlers: Mutex::new(HashMap::new()),
                identity: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl BrokerHandle for FakeHandle {
        async fn set_identity(&self, id: &str) -> Result<(), BrokerError> {
            *self.identity.lock().unwrap() = Some(id.to_string());
            Ok(())
        }
        async fn register(&self, name: &str, handler: HandlerRef) -> Result<(), BrokerError> {
            self.registered.lock().unwrap().push(name.to_string());
            self.handlers
                .lock()
                .unwrap()
                .insert(name.to_string(), handler);
            Ok(())
        }
        async fn serve(&self) -> Result<(), BrokerError> {
            match self.plan {
                ServePlan::Clean => Ok(()),
                ServePlan::ConnectionLost => Err(BrokerError::ConnectionLost {
                    detail: "peer closed".into(),
                }),
                ServePlan::Forever => std::future::pending().await,
            }
        }
        async fn disconnect(&self) {}
    }

    enum ConnectPlan {
        Handle(Arc<FakeHandle>),
        Unavailable,
    }

    struct FakeConnector {
        plan: ConnectPlan,
    }

    #[async_trait]
    impl Connector for FakeConnector {
        async fn connect(&self, hosts: &[String]) -> Result<HandleRef, BrokerError> {
            match &self.plan {
                ConnectPlan::Handle(h) => Ok(h.clone()),
                ConnectPlan::Unavailable => Err(BrokerError::Unavailable {
                    detail: format!("tried {} hosts", hosts.len()),
                }),
            }
        }
    }

    fn echo() -> HandlerRef {
        use crate::error::JobError;
        JobFn::arc(|_w: HandleRef, job: crate::broker::Job| async move {
            Ok::<_, JobError>(job.payload)
        })
    }

    fn descriptors(inputs: Vec<TaskInput>) -> Arc<Vec<TaskDescriptor>> {
        Arc::new(inputs.into_iter().map(TaskInput::into_descriptor).collect())
    }

    fn context(
        connector: Arc<dyn Connector>,
        tasks: Arc<Vec<TaskDescriptor>>,
        outcomes: OutcomeSender,
        client_id: Option<String>,
    ) -> WorkerContext {
        WorkerContext {
            tasks,
            hosts: Arc::new(vec!["localhost:4730".into()]),
            connector,
            outcomes,
            client_id,
            verbose: false,
            cancel: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn test_registers_tasks_in_input_order_with_identity() {
        let handle = FakeHandle::new(ServePlan::Clean);
        let connector = Arc::new(FakeConnector {
            plan: ConnectPlan::Handle(handle.clone()),
        });
        let (tx, _rx) = crate::outcome::channel();
        let tasks = descriptors(vec![
            ("alpha", echo()).into(),
            ("beta", echo()).into(),
            ("alpha", echo()).into(),
        ]);

        run(context(connector, tasks, tx, Some("w1".into()))).await;

        // Input order preserved; the duplicate overwrote the first entry.
        assert_eq!(
            *handle.registered.lock().unwrap(),
            vec!["alpha", "beta", "alpha"]
        );
        assert_eq!(handle.handlers.lock().unwrap().len(), 2);
        assert_eq!(handle.identity.lock().unwrap().as_deref(), Some("w1"));
    }

    #[tokio::test]
    async fn test_unavailable_broker_reports_and_exits() {
        let connector = Arc::new(FakeConnector {
            plan: ConnectPlan::Unavailable,
        });
        let (tx, mut rx) = crate::outcome::channel();
        let tasks = descriptors(vec![("alpha", echo()).into()]);

        run(context(connector, tasks, tx, None)).await;

        match rx.try_recv().unwrap() {
            Outcome::BrokerUnavailable { detail } => assert_eq!(detail, "tried 1 hosts"),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(rx.try_recv().is_err(), "at most one outcome per lifetime");
    }

    #[tokio::test]
    async fn test_clean_serve_exit_reports_normal() {
        let handle = FakeHandle::new(ServePlan::Clean);
        let connector = Arc::new(FakeConnector {
            plan: ConnectPlan::Handle(handle),
        });
        let (tx, mut rx) = crate::outcome::channel();
        let tasks = descriptors(vec![("alpha", echo()).into()]);

        run(context(connector, tasks, tx, None)).await;

        assert_eq!(rx.try_recv().unwrap(), Outcome::Normal);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connection_lost_exits_without_outcome() {
        let handle = FakeHandle::new(ServePlan::ConnectionLost);
        let connector = Arc::new(FakeConnector {
            plan: ConnectPlan::Handle(handle),
        });
        let (tx, mut rx) = crate::outcome::channel();
        let tasks = descriptors(vec![("alpha", echo()).into()]);

        run(context(connector, tasks, tx, None)).await;

        // The crash path is silent: detection happens by liveness.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancellation_exits_silently() {
        let handle = FakeHandle::new(ServePlan::Forever);
        let connector = Arc::new(FakeConnector {
            plan: ConnectPlan::Handle(handle),
        });
        let (tx, mut rx) = crate::outcome::channel();
        let tasks = descriptors(vec![("alpha", echo()).into()]);
        let ctx = context(connector, tasks, tx, None);
        let cancel = ctx.cancel.clone();

        let join = tokio::spawn(run(ctx));
        tokio::task::yield_now().await;
        cancel.cancel();
        join.await.unwrap();

        assert!(rx.try_recv().is_err(), "cancelled worker sends nothing");
    }
}
