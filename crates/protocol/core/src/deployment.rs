//! An in-process deployment wiring a dispatcher to an executor through a [MockMailbox].

use crate::{
    CallTarget, DeliveryError, DeliveryHandle, DeploymentConfig, Dispatcher, Executor,
    ExecutorError, MockMailbox, TargetRegistry,
};
use alloy_primitives::Address;
use tracing::info;

/// Both ends of a deployment, living in one process.
///
/// The dispatcher submits to a [MockMailbox] serving the configured destination, and the mailbox
/// delivers to an executor forwarding into a [TargetRegistry]. Nothing moves until one of the
/// `process_*` methods is called.
#[derive(Debug)]
pub struct LocalDeployment {
    /// The origin side.
    pub dispatcher: Dispatcher<MockMailbox>,
    /// The destination side.
    pub executor: Executor<TargetRegistry>,
}

impl LocalDeployment {
    /// Wires up a deployment from `config` with no targets.
    pub fn new(config: &DeploymentConfig) -> Self {
        let mailbox =
            MockMailbox::new(config.origin_chain_id, config.destination_chain_id, config.mailbox);
        info!(
            target: "deployment",
            origin = config.origin_chain_id,
            destination = config.destination_chain_id,
            dispatcher = %config.dispatcher,
            executor = %config.executor,
            mailbox = %config.mailbox,
            "Deployed dispatcher and executor",
        );

        Self {
            dispatcher: Dispatcher::new(config.dispatcher_config(), mailbox),
            executor: Executor::new(config.executor_config(), TargetRegistry::new()),
        }
    }

    /// Places `target` at `address` on the destination chain.
    pub fn with_target(mut self, address: Address, target: impl CallTarget) -> Self {
        self.executor.environment_mut().insert(address, target);
        self
    }

    /// Returns the target at `address` if it is a `T`.
    pub fn target<T: CallTarget>(&self, address: Address) -> Option<&T> {
        self.executor.environment().get(address)
    }

    /// Returns the mailbox between the two ends.
    pub const fn mailbox(&self) -> &MockMailbox {
        self.dispatcher.transport()
    }

    /// Delivers the oldest pending message to the executor.
    pub fn process_next_pending(
        &mut self,
    ) -> Result<Option<DeliveryHandle>, DeliveryError<ExecutorError>> {
        self.dispatcher.transport_mut().process_next_pending(&mut self.executor)
    }

    /// Delivers every pending message to the executor, stopping at the first refusal.
    pub fn process_all_pending(
        &mut self,
    ) -> Result<Vec<DeliveryHandle>, DeliveryError<ExecutorError>> {
        self.dispatcher.transport_mut().process_all_pending(&mut self.executor)
    }

    /// Delivers the message submitted under `handle` to the executor again.
    pub fn redeliver(&mut self, handle: DeliveryHandle) -> Result<(), DeliveryError<ExecutorError>> {
        self.dispatcher.transport().redeliver(handle, &mut self.executor)
    }
}
