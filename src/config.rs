//! # Pool configuration.
//!
//! Provides [`PoolConfig`], the centralized settings for a supervised
//! worker pool.
//!
//! ## Sentinel values
//! - `max_workers = 0` → corrected to detected hardware concurrency (min 1)
//! - `id_prefix = None` → workers register no client identity
//!
//! The timing knobs (`poll_interval`, `reconnect_delay`, `settle_delay`)
//! are flat constants by design: the pause after a broker outage never
//! grows or jitters. They are configurable only so tests can compress time.

use std::time::Duration;

/// Configuration for a [`PoolSupervisor`](crate::PoolSupervisor).
///
/// Defines:
/// - **Broker addressing**: host list handed to every worker at launch
/// - **Pool sizing**: target worker count with a hardware-concurrency default
/// - **Identity**: optional per-worker client-id prefix
/// - **Shutdown behavior**: whether the default signal handling is installed
/// - **Cadence**: outcome-channel wait bound and relaunch delays
///
/// ## Field semantics
/// - `host_list`: broker addresses, tried in order by the connector
/// - `max_workers`: `0` = detected hardware concurrency (min 1)
/// - `id_prefix`: `Some("w")` → workers identify as `w1`, `w2`, ... using the
///   monotonic launch counter; `None` disables identity assignment
/// - `use_sighandler`: trap SIGINT/SIGTERM into the shared cancellation
///   (disable to install your own strategy; you must then cancel the token)
/// - `verbose`: gate for launch/registration info logs and handler-failure
///   error logs
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Broker host addresses shared read-only with every worker.
    pub host_list: Vec<String>,

    /// Target number of live workers.
    ///
    /// `0` is corrected to the detected hardware concurrency, or 1 if
    /// undetectable. Never left at zero.
    pub max_workers: usize,

    /// Prefix for per-worker client identities.
    ///
    /// The supervisor appends its monotonic launch counter, so identities
    /// are unique for the lifetime of the supervisor and never reused even
    /// after a worker dies and is replaced.
    pub id_prefix: Option<String>,

    /// Install the default interrupt handling (SIGINT/SIGTERM → cancel).
    pub use_sighandler: bool,

    /// Emit optional diagnostics (worker counts, registrations, job errors).
    pub verbose: bool,

    /// Bounded wait on the completion channel per supervision cycle.
    ///
    /// A timeout with no message is not an error; it forces a periodic
    /// liveness pass so crashed workers that never reported are caught.
    pub poll_interval: Duration,

    /// Pause after a `BrokerUnavailable` outcome before relaunching.
    ///
    /// Prevents a hot relaunch loop against a broker that is down. Flat,
    /// deliberately not adaptive.
    pub reconnect_delay: Duration,

    /// Settle pause before each liveness sweep, letting just-terminated
    /// workers finish winding down.
    pub settle_delay: Duration,
}

impl PoolConfig {
    /// Creates a configuration for the given broker hosts with defaults
    /// for everything else.
    pub fn new(host_list: Vec<String>) -> Self {
        Self {
            host_list,
            ..Self::default()
        }
    }

    /// Returns the sanitized target worker count.
    ///
    /// - `max_workers >= 1` → used as-is
    /// - `max_workers == 0` → detected hardware concurrency, or 1
    ///
    /// # Example
    /// ```
    /// use gearpool::PoolConfig;
    ///
    /// let mut cfg = PoolConfig::default();
    /// cfg.max_workers = 0;
    /// assert!(cfg.effective_workers() >= 1);
    ///
    /// cfg.max_workers = 3;
    /// assert_eq!(cfg.effective_workers(), 3);
    /// ```
    pub fn effective_workers(&self) -> usize {
        match self.max_workers {
            0 => detected_parallelism(),
            n => n,
        }
    }
}

impl Default for PoolConfig {
    /// Default configuration:
    ///
    /// - `host_list = []` (must be filled in before use)
    /// - `max_workers = 0` (detected hardware concurrency)
    /// - `id_prefix = None` (no client identities)
    /// - `use_sighandler = true`
    /// - `verbose = false`
    /// - `poll_interval = 5s`, `reconnect_delay = 2s`, `settle_delay = 100ms`
    fn default() -> Self {
        Self {
            host_list: Vec::new(),
            max_workers: 0,
            id_prefix: None,
            use_sighandler: true,
            verbose: false,
            poll_interval: Duration::from_secs(5),
            reconnect_delay: Duration::from_secs(2),
            settle_delay: Duration::from_millis(100),
        }
    }
}

/// Detected hardware concurrency, falling back to 1 when undetectable.
pub(crate) fn detected_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Derives a worker client identity from a prefix and launch index.
pub(crate) fn worker_ident(prefix: &str, launch_index: u64) -> String {
    format!("{prefix}{launch_index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_workers_corrected_to_at_least_one() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.max_workers, 0);
        assert!(cfg.effective_workers() >= 1);
    }

    #[test]
    fn test_explicit_worker_count_respected() {
        let mut cfg = PoolConfig::new(vec!["localhost:4730".into()]);
        cfg.max_workers = 7;
        assert_eq!(cfg.effective_workers(), 7);
    }

    #[test]
    fn test_default_cadence_matches_documented_constants() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.reconnect_delay, Duration::from_secs(2));
        assert_eq!(cfg.settle_delay, Duration::from_millis(100));
        assert!(cfg.use_sighandler);
        assert!(!cfg.verbose);
    }

    #[test]
    fn test_worker_ident_appends_launch_index() {
        assert_eq!(worker_ident("w", 1), "w1");
        assert_eq!(worker_ident("w", 2), "w2");
        assert_eq!(worker_ident("pool-a-", 17), "pool-a-17");
    }
}
