//! The destination side of the protocol.

use crate::{
    ActionFailure, ActionResult, CallEnvironment, CallResult, ExecutionOutcome, ExecutorConfig,
    ExecutorError, FailurePolicy, MessageRecipient,
};
use alloy_primitives::{Address, ChainId};
use tracing::{debug, info, warn};
use xdm_primitives::{ExecutionContext, MAX_EXECUTION_GAS, MessageBody, MessageId};

/// Authenticates deliveries and executes their actions against a [CallEnvironment].
///
/// A delivery is only trusted if it arrives through the configured mailbox and from the configured
/// origin chain; anything else is refused before the body is even decoded. Deliveries are not
/// de-duplicated: handing the same body over twice executes it twice.
#[derive(Debug)]
pub struct Executor<E> {
    /// The static configuration.
    config: ExecutorConfig,
    /// Where actions are forwarded to.
    environment: E,
    /// The outcome of the last processed message.
    outcome: Option<ExecutionOutcome>,
}

impl<E: CallEnvironment> Executor<E> {
    /// Creates a new [Executor] forwarding actions into `environment`.
    pub const fn new(config: ExecutorConfig, environment: E) -> Self {
        Self { config, environment, outcome: None }
    }

    /// Checks the channel and origin of a delivery, in that order.
    fn authenticate(&self, origin: ChainId, channel: Address) -> Result<(), ExecutorError> {
        if channel != self.config.mailbox {
            return Err(ExecutorError::UntrustedChannel {
                expected: self.config.mailbox,
                actual: channel,
            });
        }
        if origin != self.config.origin_chain_id {
            return Err(ExecutorError::UnexpectedOrigin {
                expected: self.config.origin_chain_id,
                actual: origin,
            });
        }
        Ok(())
    }

    /// Executes every action of `body` in order, under the message's gas budget.
    fn execute(&mut self, origin: ChainId, body: MessageBody) -> ExecutionOutcome {
        let context = ExecutionContext::new(body.id, origin, body.sender);
        let mut remaining = match body.gas_limit {
            0 => MAX_EXECUTION_GAS,
            limit => limit.min(MAX_EXECUTION_GAS),
        };

        let mut results = Vec::with_capacity(body.actions.len());
        let mut aborted = false;
        for (index, action) in body.actions.iter().enumerate() {
            if aborted {
                results.push(ActionResult::Failed(ActionFailure::Skipped));
                continue;
            }

            let calldata = context.append_to(&action.payload);
            let result = match self.environment.call(
                self.config.address,
                action.target,
                &calldata,
                remaining,
            ) {
                None => ActionResult::Failed(ActionFailure::MissingTarget),
                Some(CallResult::Success { gas_used }) if gas_used <= remaining => {
                    remaining -= gas_used;
                    ActionResult::Succeeded { gas_used }
                }
                Some(CallResult::Revert { gas_used, data }) if gas_used <= remaining => {
                    remaining -= gas_used;
                    ActionResult::Failed(ActionFailure::Reverted(data))
                }
                // Either reported out of gas, or reported using more than it was given.
                Some(_) => {
                    remaining = 0;
                    ActionResult::Failed(ActionFailure::OutOfGas)
                }
            };

            if let ActionResult::Failed(failure) = &result {
                warn!(
                    target: "executor",
                    message_id = %body.id,
                    index,
                    target_address = %action.target,
                    ?failure,
                    "Action failed",
                );
                #[cfg(feature = "metrics")]
                metrics::counter!(crate::Metrics::ACTIONS_FAILED).increment(1);

                aborted = self.config.failure_policy == FailurePolicy::AbortBatch;
            } else {
                debug!(target: "executor", message_id = %body.id, index, "Action succeeded");
            }
            results.push(result);
        }

        ExecutionOutcome { message_id: body.id, sender: body.sender, origin, results }
    }

    /// Returns the identifier of the last processed message.
    pub fn last_message_id(&self) -> Option<MessageId> {
        self.outcome.as_ref().map(|outcome| outcome.message_id)
    }

    /// Returns the original caller of the last processed message.
    pub fn last_sender(&self) -> Option<Address> {
        self.outcome.as_ref().map(|outcome| outcome.sender)
    }

    /// Returns the origin chain of the last processed message.
    pub fn last_origin(&self) -> Option<ChainId> {
        self.outcome.as_ref().map(|outcome| outcome.origin)
    }

    /// Returns the full outcome of the last processed message.
    pub const fn last_outcome(&self) -> Option<&ExecutionOutcome> {
        self.outcome.as_ref()
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Returns the environment actions are forwarded into.
    pub const fn environment(&self) -> &E {
        &self.environment
    }

    /// Returns the environment mutably.
    pub const fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }
}

impl<E: CallEnvironment> MessageRecipient for Executor<E> {
    type Error = ExecutorError;

    fn address(&self) -> Address {
        self.config.address
    }

    fn handle(&mut self, origin: ChainId, channel: Address, body: &[u8]) -> Result<(), Self::Error> {
        let body = self
            .authenticate(origin, channel)
            .and_then(|_| MessageBody::decode(body).map_err(ExecutorError::from))
            .inspect_err(|err| {
                warn!(target: "executor", origin, %channel, %err, "Refused delivery");
                #[cfg(feature = "metrics")]
                metrics::counter!(crate::Metrics::DELIVERIES_REFUSED).increment(1);
            })?;

        let message_id = body.id;
        let outcome = self.execute(origin, body);
        info!(
            target: "executor",
            %message_id,
            origin,
            sender = %outcome.sender,
            num_actions = outcome.results.len(),
            failures = outcome.failure_count(),
            "Executed message",
        );
        #[cfg(feature = "metrics")]
        metrics::counter!(crate::Metrics::MESSAGES_EXECUTED).increment(1);

        self.outcome = Some(outcome);
        Ok(())
    }
}
