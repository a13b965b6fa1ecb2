//! Stub action targets.

use crate::{CallResult, CallTarget};
use alloy_primitives::{Address, Bytes, ChainId};
use alloy_sol_types::{Revert, SolCall, SolError, sol};
use thiserror::Error;
use xdm_primitives::{ExecutionContext, MessageId};

sol! {
    /// The entry point of [MessageTarget].
    #[derive(Debug, PartialEq, Eq)]
    function receiveMessage(string message);
}

/// Gas charged by [MessageTarget] for every accepted call.
pub const RECEIVE_MESSAGE_GAS: u64 = 50_000;

/// Reasons a [MessageTarget] reverts.
#[derive(Debug, Error)]
pub enum TargetError {
    /// The immediate caller is not the trusted executor.
    #[error("Caller {0} is not the trusted executor")]
    UntrustedCaller(Address),
    /// The calldata does not carry an execution context.
    #[error("Missing execution context")]
    MissingContext,
    /// The payload is not a `receiveMessage` call.
    #[error("Invalid calldata: {0}")]
    Calldata(#[from] alloy_sol_types::Error),
}

impl TargetError {
    /// Returns the `Error(string)` revert data for this error.
    pub fn revert_data(&self) -> Bytes {
        Revert { reason: self.to_string() }.abi_encode().into()
    }
}

/// A greeter-style target that remembers the last message it received.
///
/// Only calls forwarded by the trusted executor are accepted; the provenance is read from the
/// execution context appended to the calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTarget {
    /// The executor this target trusts.
    executor: Address,
    /// Gas charged per accepted call.
    gas_cost: u64,
    /// Identifier of the last received message.
    pub last_message_id: Option<MessageId>,
    /// Origin-chain caller of the last received message.
    pub last_sender: Option<Address>,
    /// Origin chain of the last received message.
    pub last_chain_id: Option<ChainId>,
    /// The last received message.
    pub last_message: String,
    /// Number of accepted calls.
    pub received: u64,
}

impl MessageTarget {
    /// Creates a target trusting `executor`.
    pub const fn new(executor: Address) -> Self {
        Self {
            executor,
            gas_cost: RECEIVE_MESSAGE_GAS,
            last_message_id: None,
            last_sender: None,
            last_chain_id: None,
            last_message: String::new(),
            received: 0,
        }
    }

    /// Overrides the gas charged per accepted call.
    pub const fn with_gas_cost(mut self, gas_cost: u64) -> Self {
        self.gas_cost = gas_cost;
        self
    }

    /// Returns the payload of a `receiveMessage(message)` call.
    pub fn calldata(message: &str) -> Bytes {
        receiveMessageCall { message: message.to_string() }.abi_encode().into()
    }

    fn receive(&mut self, caller: Address, calldata: &[u8]) -> Result<(), TargetError> {
        if caller != self.executor {
            return Err(TargetError::UntrustedCaller(caller));
        }
        let (payload, context) =
            ExecutionContext::split(calldata).ok_or(TargetError::MissingContext)?;
        let call = receiveMessageCall::abi_decode(payload)?;

        self.last_message_id = Some(context.message_id);
        self.last_sender = Some(context.sender);
        self.last_chain_id = Some(context.origin_chain_id);
        self.last_message = call.message;
        self.received += 1;
        Ok(())
    }
}

impl CallTarget for MessageTarget {
    fn call(&mut self, caller: Address, calldata: &[u8], gas_limit: u64) -> CallResult {
        if gas_limit < self.gas_cost {
            return CallResult::OutOfGas;
        }
        match self.receive(caller, calldata) {
            Ok(()) => CallResult::Success { gas_used: self.gas_cost },
            Err(err) => CallResult::Revert { gas_used: 0, data: err.revert_data() },
        }
    }
}

/// A call observed by a [RecordingTarget].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The immediate caller.
    pub caller: Address,
    /// The calldata without the execution context, or all of it if none could be split off.
    pub payload: Bytes,
    /// The execution context, if present.
    pub context: Option<ExecutionContext>,
    /// The gas handed to the call.
    pub gas_limit: u64,
}

/// A target that records every call and then succeeds or reverts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingTarget {
    calls: Vec<RecordedCall>,
    gas_cost: u64,
    revert: bool,
}

impl RecordingTarget {
    /// Creates a target succeeding with `gas_cost`.
    pub const fn new(gas_cost: u64) -> Self {
        Self { calls: Vec::new(), gas_cost, revert: false }
    }

    /// Creates a target reverting after spending `gas_cost`.
    pub const fn reverting(gas_cost: u64) -> Self {
        Self { calls: Vec::new(), gas_cost, revert: true }
    }

    /// Returns the calls observed so far, oldest first.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }
}

impl CallTarget for RecordingTarget {
    fn call(&mut self, caller: Address, calldata: &[u8], gas_limit: u64) -> CallResult {
        let (payload, context) = match ExecutionContext::split(calldata) {
            Some((payload, context)) => (payload, Some(context)),
            None => (calldata, None),
        };
        self.calls.push(RecordedCall {
            caller,
            payload: Bytes::copy_from_slice(payload),
            context,
            gas_limit,
        });

        if gas_limit < self.gas_cost {
            CallResult::OutOfGas
        } else if self.revert {
            CallResult::Revert {
                gas_used: self.gas_cost,
                data: Revert { reason: "RecordingTarget: revert".into() }.abi_encode().into(),
            }
        } else {
            CallResult::Success { gas_used: self.gas_cost }
        }
    }
}
