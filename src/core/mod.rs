//! Supervision core: pool state machine, liveness reconciliation, and
//! interrupt handling.

pub(crate) mod reconcile;
pub(crate) mod shutdown;
mod supervisor;

pub use supervisor::PoolSupervisor;
