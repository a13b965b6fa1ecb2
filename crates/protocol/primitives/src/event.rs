//! Dispatch records and their ERC-5164 log encoding.
//!
//! <https://eips.ethereum.org/EIPS/eip-5164#messagedispatcher>

use crate::{
    Action, DecodeError, DecodeResult, MessageBatchDispatched, MessageDispatched, MessageId,
};
use alloc::{vec, vec::Vec};
use alloy_primitives::{Address, ChainId, Log, LogData, U256};
use alloy_sol_types::SolEvent;
use derive_more::Constructor;

/// The externally visible trail of a successful dispatch, consumed by relayers and indexers.
///
/// Field order is part of the interface: `(id, sender, destination, actions, gas_limit)`.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DispatchRecord {
    /// The message identifier.
    pub id: MessageId,
    /// The original caller.
    pub sender: Address,
    /// The destination chain.
    pub destination: ChainId,
    /// The dispatched actions, in execution order.
    pub actions: Vec<Action>,
    /// The gas budget attached to the message.
    pub gas_limit: u64,
}

impl DispatchRecord {
    /// Encodes the record as an ERC-5164 log.
    ///
    /// A single action is encoded as [MessageDispatched], anything else as
    /// [MessageBatchDispatched]. The gas budget is not part of either event.
    pub fn log_data(&self) -> LogData {
        let to_chain_id = U256::from(self.destination);
        match self.actions.as_slice() {
            [action] => MessageDispatched {
                messageId: self.id,
                from: self.sender,
                toChainId: to_chain_id,
                to: action.target,
                data: action.payload.clone(),
            }
            .encode_log_data(),
            actions => MessageBatchDispatched {
                messageId: self.id,
                from: self.sender,
                toChainId: to_chain_id,
                messages: actions.to_vec(),
            }
            .encode_log_data(),
        }
    }

    /// Returns the log emitted by the dispatcher at `dispatcher`.
    pub fn to_log(&self, dispatcher: Address) -> Log {
        Log { address: dispatcher, data: self.log_data() }
    }
}

/// Parses a dispatch log back into `(id, sender, destination, actions)`.
///
/// Returns [DecodeError::NotADispatchLog] for logs that are neither [MessageDispatched] nor
/// [MessageBatchDispatched].
pub fn parse_dispatch_log(
    log: &LogData,
) -> DecodeResult<(MessageId, Address, ChainId, Vec<Action>)> {
    let to_chain_id =
        |value: U256| ChainId::try_from(value).map_err(|_| DecodeError::NotADispatchLog);

    match log.topics().first() {
        Some(topic) if *topic == MessageDispatched::SIGNATURE_HASH => {
            let event = MessageDispatched::decode_log_data(log)?;
            Ok((
                event.messageId,
                event.from,
                to_chain_id(event.toChainId)?,
                vec![Action::new(event.to, event.data)],
            ))
        }
        Some(topic) if *topic == MessageBatchDispatched::SIGNATURE_HASH => {
            let event = MessageBatchDispatched::decode_log_data(log)?;
            Ok((event.messageId, event.from, to_chain_id(event.toChainId)?, event.messages))
        }
        _ => Err(DecodeError::NotADispatchLog),
    }
}
