//! The provenance suffix the executor appends to forwarded calls.
//!
//! Targets cannot see the origin-chain caller directly: the immediate caller of every forwarded
//! call is the executor. Following the ERC-5164 convention, the executor appends
//! `abi.encodePacked(messageId, uint256(fromChainId), from)` to the calldata. A target that
//! trusts the executor recovers the provenance by splitting these trailing bytes off.
//!
//! <https://eips.ethereum.org/EIPS/eip-5164#messageexecutor>

use crate::{EXECUTION_CONTEXT_LEN, MessageId};
use alloc::vec::Vec;
use alloy_primitives::{Address, B256, Bytes, ChainId, U256};
use derive_more::Constructor;

/// Provenance of a forwarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct ExecutionContext {
    /// The message the call belongs to.
    pub message_id: MessageId,
    /// The chain the message was dispatched from.
    pub origin_chain_id: ChainId,
    /// The original caller on the origin chain.
    pub sender: Address,
}

impl ExecutionContext {
    /// Returns `payload ‖ messageId ‖ uint256(originChainId) ‖ sender`.
    pub fn append_to(&self, payload: &[u8]) -> Bytes {
        let mut calldata = Vec::with_capacity(payload.len() + EXECUTION_CONTEXT_LEN);
        calldata.extend_from_slice(payload);
        calldata.extend_from_slice(self.message_id.as_slice());
        calldata.extend_from_slice(&U256::from(self.origin_chain_id).to_be_bytes::<32>());
        calldata.extend_from_slice(self.sender.as_slice());
        calldata.into()
    }

    /// Splits calldata into the original payload and its [ExecutionContext].
    ///
    /// Returns `None` if the calldata is too short to carry a context, or the encoded chain ID
    /// does not fit in a [ChainId].
    pub fn split(calldata: &[u8]) -> Option<(&[u8], Self)> {
        let payload_len = calldata.len().checked_sub(EXECUTION_CONTEXT_LEN)?;
        let (payload, suffix) = calldata.split_at(payload_len);

        let message_id = B256::from_slice(&suffix[..32]);
        let origin_chain_id = U256::from_be_slice(&suffix[32..64]).try_into().ok()?;
        let sender = Address::from_slice(&suffix[64..]);

        Some((payload, Self { message_id, origin_chain_id, sender }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_split() {
        let context =
            ExecutionContext::new(B256::repeat_byte(0x01), 1, Address::repeat_byte(0x02));
        let calldata = context.append_to(&[0xca, 0xfe]);

        assert_eq!(calldata.len(), 2 + EXECUTION_CONTEXT_LEN);

        let (payload, recovered) = ExecutionContext::split(&calldata).unwrap();
        assert_eq!(payload, &[0xca_u8, 0xfe][..]);
        assert_eq!(recovered, context);
    }

    #[test]
    fn test_split_empty_payload() {
        let context = ExecutionContext::new(B256::ZERO, u64::MAX, Address::ZERO);
        let calldata = context.append_to(&[]);

        let (payload, recovered) = ExecutionContext::split(&calldata).unwrap();
        assert!(payload.is_empty());
        assert_eq!(recovered, context);
    }

    #[test]
    fn test_split_too_short() {
        assert!(ExecutionContext::split(&[0u8; EXECUTION_CONTEXT_LEN - 1]).is_none());
    }

    #[test]
    fn test_split_chain_id_overflow() {
        let mut calldata = [0u8; EXECUTION_CONTEXT_LEN];
        calldata[32] = 0x01;
        assert!(ExecutionContext::split(&calldata).is_none());
    }
}
