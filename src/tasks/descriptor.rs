//! # Task descriptors and the accepted configuration shapes.
//!
//! A task is a named unit of work with an associated handler. Callers may
//! supply tasks in three shapes, all normalized to [`TaskDescriptor`]
//! before registration:
//!
//! - a full [`TaskDescriptor`];
//! - a `(name, handler)` pair;
//! - an opaque [`NamedHandler`] exposing its own task name.
//!
//! Given the same `(name, handler)`, the resulting registration is
//! indistinguishable regardless of input shape.
//!
//! ## Rules
//! - Descriptors are immutable once constructed and supplied wholesale at
//!   pool-construction time.
//! - Registration order is the input order; duplicate names overwrite
//!   earlier registrations at the broker handle (last wins).
//! - Descriptors are guarded by default; [`TaskDescriptor::raw`] opts out
//!   of the failure boundary for one task.

use std::sync::Arc;

use crate::tasks::handler::{HandlerRef, NamedHandler};
use crate::tasks::wrapper::Guarded;

/// A named task and its handler, ready for registration.
#[derive(Clone)]
pub struct TaskDescriptor {
    name: Arc<str>,
    handler: HandlerRef,
    guarded: bool,
}

impl TaskDescriptor {
    /// Creates a guarded descriptor: failures disconnect the worker's
    /// broker connection before propagating, so the job is redelivered.
    pub fn new(name: impl Into<Arc<str>>, handler: HandlerRef) -> Self {
        Self {
            name: name.into(),
            handler,
            guarded: true,
        }
    }

    /// Creates a raw descriptor: the handler is registered as-is, without
    /// the disconnect-and-requeue guarantee or verbose error logging.
    pub fn raw(name: impl Into<Arc<str>>, handler: HandlerRef) -> Self {
        Self {
            name: name.into(),
            handler,
            guarded: false,
        }
    }

    /// Returns the task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the failure boundary applies to this task.
    pub fn is_guarded(&self) -> bool {
        self.guarded
    }

    /// Produces the handler to register: the raw handler, or the handler
    /// routed through the failure boundary.
    pub(crate) fn bind(&self, verbose: bool) -> HandlerRef {
        if self.guarded {
            Arc::new(Guarded::new(self.name.clone(), self.handler.clone(), verbose))
        } else {
            self.handler.clone()
        }
    }
}

/// One task-configuration input, in any of the three accepted shapes.
pub enum TaskInput {
    /// A full descriptor.
    Descriptor(TaskDescriptor),
    /// A `(name, handler)` pair.
    Pair(Arc<str>, HandlerRef),
    /// A handler that carries its own task name.
    Named(Arc<dyn NamedHandler>),
}

impl TaskInput {
    /// Normalizes this input to a descriptor.
    ///
    /// Pairs and named handlers become guarded descriptors, matching the
    /// descriptor default.
    pub fn into_descriptor(self) -> TaskDescriptor {
        match self {
            TaskInput::Descriptor(d) => d,
            TaskInput::Pair(name, handler) => TaskDescriptor::new(name, handler),
            TaskInput::Named(named) => {
                let name: Arc<str> = named.task_name().into();
                let handler: HandlerRef = named;
                TaskDescriptor::new(name, handler)
            }
        }
    }
}

impl From<TaskDescriptor> for TaskInput {
    fn from(d: TaskDescriptor) -> Self {
        TaskInput::Descriptor(d)
    }
}

impl<S: Into<Arc<str>>> From<(S, HandlerRef)> for TaskInput {
    fn from((name, handler): (S, HandlerRef)) -> Self {
        TaskInput::Pair(name.into(), handler)
    }
}

impl From<Arc<dyn NamedHandler>> for TaskInput {
    fn from(named: Arc<dyn NamedHandler>) -> Self {
        TaskInput::Named(named)
    }
}
