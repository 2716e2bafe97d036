//! Task definitions: handlers, descriptors, and the failure boundary.

mod descriptor;
mod handler;
mod wrapper;

pub use descriptor::{TaskDescriptor, TaskInput};
pub use handler::{HandlerRef, JobFn, JobHandler, NamedHandler};
pub use wrapper::Guarded;
