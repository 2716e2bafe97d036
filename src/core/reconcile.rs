//! # Liveness reconciliation.
//!
//! A worker that crashes never sends an outcome message, so the supervisor
//! cannot rely on the completion channel alone: from its perspective a
//! genuine crash looks identical to "a worker that hasn't reported yet".
//! The only signal for that failure class is liveness, checked here as a
//! first-class step rather than inline in the supervision loop.
//!
//! ## Rules
//! - Outcome messages are unordered evidence; the entry set is reconciled
//!   against actual liveness every cycle, message or not.
//! - No entry survives its worker: a finished join handle drops the entry
//!   on the next sweep.

use tokio::task::JoinHandle;

/// One live worker as tracked by the supervisor.
///
/// The set of pool entries is the supervisor's only mutable state besides
/// the launch counter.
pub(crate) struct PoolEntry {
    /// Position in the monotonic launch sequence; never reused.
    pub launch_index: u64,
    /// Join handle of the worker's execution context.
    pub join: JoinHandle<()>,
}

/// Drops entries whose worker is no longer live; returns the launch
/// indices of the removed entries. Surviving entries keep their launch
/// order.
pub(crate) fn reconcile(entries: &mut Vec<PoolEntry>) -> Vec<u64> {
    let mut dropped = Vec::new();
    entries.retain(|entry| {
        if entry.join.is_finished() {
            dropped.push(entry.launch_index);
            false
        } else {
            true
        }
    });
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    fn entry(launch_index: u64, join: JoinHandle<()>) -> PoolEntry {
        PoolEntry { launch_index, join }
    }

    #[tokio::test]
    async fn test_finished_workers_are_dropped_and_order_kept() {
        let gate = CancellationToken::new();

        let done = tokio::spawn(async {});
        // Give the finished task a beat to settle so is_finished() is stable.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let g1 = gate.clone();
        let live1 = tokio::spawn(async move { g1.cancelled().await });
        let g2 = gate.clone();
        let live2 = tokio::spawn(async move { g2.cancelled().await });

        let mut entries = vec![entry(1, live1), entry(2, done), entry(3, live2)];
        let dropped = reconcile(&mut entries);

        assert_eq!(dropped, vec![2]);
        let kept: Vec<u64> = entries.iter().map(|e| e.launch_index).collect();
        assert_eq!(kept, vec![1, 3]);

        gate.cancel();
        for e in entries {
            e.join.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_empty_pool_reconciles_to_nothing() {
        let mut entries: Vec<PoolEntry> = Vec::new();
        assert!(reconcile(&mut entries).is_empty());
    }

    #[tokio::test]
    async fn test_all_live_pool_is_untouched() {
        let gate = CancellationToken::new();
        let mut entries: Vec<PoolEntry> = (1..=3)
            .map(|i| {
                let g = gate.clone();
                entry(i, tokio::spawn(async move { g.cancelled().await }))
            })
            .collect();

        assert!(reconcile(&mut entries).is_empty());
        assert_eq!(entries.len(), 3);

        gate.cancel();
        for e in entries {
            e.join.await.unwrap();
        }
    }
}
