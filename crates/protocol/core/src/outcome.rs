//! The executor's record of the last processed message.

use alloy_primitives::{Address, Bytes, ChainId, LogData, U256};
use alloy_sol_types::SolEvent;
use xdm_primitives::{MessageId, MessageIdExecuted};

/// Why an action did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionFailure {
    /// The target reverted with the given data.
    Reverted(Bytes),
    /// The action exhausted the message's remaining gas.
    OutOfGas,
    /// Nothing lives at the target address.
    MissingTarget,
    /// The action was not attempted because an earlier action failed.
    Skipped,
}

/// The result of a single action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// The action succeeded.
    Succeeded {
        /// Gas consumed by the action.
        gas_used: u64,
    },
    /// The action failed.
    Failed(ActionFailure),
}

impl ActionResult {
    /// Returns `true` if the action succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// What the executor observed while processing its last message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// The message identifier.
    pub message_id: MessageId,
    /// The original caller on the origin chain.
    pub sender: Address,
    /// The origin chain the delivery came from.
    pub origin: ChainId,
    /// The per-action results, in execution order.
    pub results: Vec<ActionResult>,
}

impl ExecutionOutcome {
    /// Returns `true` if every action succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(ActionResult::is_success)
    }

    /// Returns the number of actions that did not succeed.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|result| !result.is_success()).count()
    }

    /// Returns the total gas consumed by successful actions.
    pub fn gas_used(&self) -> u64 {
        self.results
            .iter()
            .map(|result| match result {
                ActionResult::Succeeded { gas_used } => *gas_used,
                ActionResult::Failed(_) => 0,
            })
            .sum()
    }

    /// Returns the ERC-5164 `MessageIdExecuted` encoding of this outcome.
    ///
    /// The executor does not emit it on its own; callers wanting a receipt of execution attach it
    /// where they need it.
    pub fn executed_log_data(&self) -> LogData {
        MessageIdExecuted { fromChainId: U256::from(self.origin), messageId: self.message_id }
            .encode_log_data()
    }
}
