//! Metrics for the dispatcher and executor.

/// Container for metrics.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter of messages accepted by the transport.
    pub const MESSAGES_DISPATCHED: &str = "xdm_dispatcher_messages_dispatched";

    /// Identifier for the counter of dispatches the transport rejected.
    pub const DISPATCH_REJECTED: &str = "xdm_dispatcher_rejected";

    /// Identifier for the counter of messages executed.
    pub const MESSAGES_EXECUTED: &str = "xdm_executor_messages_executed";

    /// Identifier for the counter of deliveries refused by the executor.
    pub const DELIVERIES_REFUSED: &str = "xdm_executor_deliveries_refused";

    /// Identifier for the counter of actions that did not succeed.
    pub const ACTIONS_FAILED: &str = "xdm_executor_actions_failed";

    /// Initializes metrics for the dispatcher and executor.
    ///
    /// This does two things:
    /// * Describes various metrics.
    /// * Initializes metrics to 0 so they can be queried immediately.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    /// Describes metrics used in [`xdm_core`][crate].
    pub fn describe() {
        metrics::describe_counter!(
            Self::MESSAGES_DISPATCHED,
            "Number of messages accepted by the transport"
        );
        metrics::describe_counter!(
            Self::DISPATCH_REJECTED,
            "Number of dispatches rejected by the transport"
        );
        metrics::describe_counter!(Self::MESSAGES_EXECUTED, "Number of messages executed");
        metrics::describe_counter!(
            Self::DELIVERIES_REFUSED,
            "Number of deliveries refused by the executor"
        );
        metrics::describe_counter!(Self::ACTIONS_FAILED, "Number of actions that did not succeed");
    }

    /// Initializes metrics to `0` so they can be queried immediately.
    pub fn zero() {
        metrics::counter!(Self::MESSAGES_DISPATCHED).absolute(0);
        metrics::counter!(Self::DISPATCH_REJECTED).absolute(0);
        metrics::counter!(Self::MESSAGES_EXECUTED).absolute(0);
        metrics::counter!(Self::DELIVERIES_REFUSED).absolute(0);
        metrics::counter!(Self::ACTIONS_FAILED).absolute(0);
    }
}
