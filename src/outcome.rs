//! # Completion channel between workers and the supervisor.
//!
//! Every worker holds a clone of the [`OutcomeSender`]; the supervisor
//! holds the sole receiver. A worker transmits **at most one**
//! [`Outcome`] just before terminating:
//!
//! - [`Outcome::Normal`] — the serve loop exited cleanly (unexpected in
//!   steady state, logged as noteworthy);
//! - [`Outcome::BrokerUnavailable`] — no broker host was reachable.
//!
//! A worker that panics or dies on the handler-failure path sends nothing:
//! its crash is detected by the supervisor's liveness sweep, not by message
//! receipt. Outcomes arrive in no particular order relative to launches;
//! the supervisor treats them as unordered evidence.

use tokio::sync::mpsc;

/// Terminal status a worker reports before exiting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The worker's serve loop exited cleanly.
    ///
    /// Should not normally occur: handler failures exit through the
    /// failure boundary without reporting, and shutdown exits through
    /// cancellation without reporting.
    Normal,

    /// No configured broker host was reachable at connect or serve time.
    ///
    /// The supervisor pauses briefly before relaunching this worker's
    /// replacement.
    BrokerUnavailable {
        /// Connector-supplied detail about the failure.
        detail: String,
    },
}

impl Outcome {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Normal => "outcome_normal",
            Outcome::BrokerUnavailable { .. } => "outcome_broker_unavailable",
        }
    }
}

/// Sending half held (cloned) by every worker.
pub(crate) type OutcomeSender = mpsc::UnboundedSender<Outcome>;

/// Receiving half held by the supervisor alone.
pub(crate) type OutcomeReceiver = mpsc::UnboundedReceiver<Outcome>;

/// Creates the completion channel.
///
/// Unbounded: each worker sends at most once per lifetime, so the queue
/// depth is bounded by the pool size in practice, and `send` stays
/// infallible on the worker's exit path.
pub(crate) fn channel() -> (OutcomeSender, OutcomeReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Normal.as_label(), "outcome_normal");
        assert_eq!(
            Outcome::BrokerUnavailable { detail: "x".into() }.as_label(),
            "outcome_broker_unavailable"
        );
    }

    #[tokio::test]
    async fn test_channel_is_multi_producer_single_consumer() {
        let (tx, mut rx) = channel();
        let tx2 = tx.clone();
        tx.send(Outcome::Normal).unwrap();
        tx2.send(Outcome::BrokerUnavailable { detail: "d".into() })
            .unwrap();
        assert_eq!(rx.recv().await, Some(Outcome::Normal));
        assert_eq!(
            rx.recv().await,
            Some(Outcome::BrokerUnavailable { detail: "d".into() })
        );
    }
}
