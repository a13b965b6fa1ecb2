//! Message identity primitives.
//!
//! <https://eips.ethereum.org/EIPS/eip-5164>

use crate::{Action, DispatchRecord, MESSAGE_ID_PREIMAGE_LEN, MessageBody};
use alloc::vec::Vec;
use alloy_primitives::{Address, B256, Bytes, ChainId, U256, keccak256};

impl Action {
    /// Creates a new [Action] calling `target` with `payload`.
    pub fn new(target: Address, payload: impl Into<Bytes>) -> Self {
        Self { target, payload: payload.into() }
    }
}

/// The 256-bit identifier of a dispatched message.
pub type MessageId = B256;

/// Packs `(uint256 chainId, address executor, uint256 nonce)` the way Solidity's
/// `abi.encodePacked` does.
pub fn message_id_preimage(
    chain_id: ChainId,
    executor: Address,
    nonce: u64,
) -> [u8; MESSAGE_ID_PREIMAGE_LEN] {
    let mut packed = [0u8; MESSAGE_ID_PREIMAGE_LEN];
    packed[..32].copy_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    packed[32..52].copy_from_slice(executor.as_slice());
    packed[52..].copy_from_slice(&U256::from(nonce).to_be_bytes::<32>());
    packed
}

/// Derives the [MessageId] of the `nonce`th message sent to `executor` on `chain_id`.
///
/// `keccak256(abi.encodePacked(uint256(chainId), executor, uint256(nonce)))`
pub fn compute_message_id(chain_id: ChainId, executor: Address, nonce: u64) -> MessageId {
    keccak256(message_id_preimage(chain_id, executor, nonce))
}

/// A message built by the dispatcher for a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The derived identifier.
    pub id: MessageId,
    /// The destination chain.
    pub destination: ChainId,
    /// The original caller on the origin chain.
    pub sender: Address,
    /// The per-destination sequence number.
    pub nonce: u64,
    /// The actions, in execution order.
    pub actions: Vec<Action>,
    /// Upper bound on the gas spent executing the actions.
    pub gas_limit: u64,
}

impl Message {
    /// Builds a new [Message], deriving its identifier from the destination, the destination
    /// executor and the nonce.
    pub fn new(
        destination: ChainId,
        executor: Address,
        sender: Address,
        nonce: u64,
        actions: Vec<Action>,
        gas_limit: u64,
    ) -> Self {
        let id = compute_message_id(destination, executor, nonce);
        Self { id, destination, sender, nonce, actions, gas_limit }
    }

    /// Returns the body handed to the transport.
    pub fn body(&self) -> MessageBody {
        MessageBody::new(self.sender, self.id, self.actions.clone(), self.gas_limit)
    }

    /// Returns the record emitted for this message.
    pub fn record(&self) -> DispatchRecord {
        DispatchRecord::new(
            self.id,
            self.sender,
            self.destination,
            self.actions.clone(),
            self.gas_limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};
    use proptest::prelude::*;

    #[test]
    fn test_preimage_layout() {
        let executor = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
        let packed = message_id_preimage(2, executor, 1);

        assert_eq!(packed.len(), 84);
        assert_eq!(packed[31], 2);
        assert!(packed[..31].iter().all(|b| *b == 0));
        assert_eq!(&packed[32..52], executor.as_slice());
        assert_eq!(packed[83], 1);
        assert!(packed[52..83].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_compute_message_id_matches_packed_keccak() {
        let executor = Address::repeat_byte(0x11);
        let mut preimage = Vec::new();
        preimage.extend_from_slice(&hex!(
            "000000000000000000000000000000000000000000000000000000000000000a"
        ));
        preimage.extend_from_slice(executor.as_slice());
        preimage.extend_from_slice(&hex!(
            "0000000000000000000000000000000000000000000000000000000000000007"
        ));

        assert_eq!(compute_message_id(10, executor, 7), keccak256(&preimage));
    }

    #[test]
    fn test_message_new_derives_id() {
        let executor = Address::repeat_byte(0x22);
        let sender = Address::repeat_byte(0x33);
        let actions = vec![Action::new(Address::repeat_byte(0x44), Bytes::new())];
        let message = Message::new(2, executor, sender, 1, actions.clone(), 1_000_000);

        assert_eq!(message.id, compute_message_id(2, executor, 1));

        let body = message.body();
        assert_eq!(body.id, message.id);
        assert_eq!(body.sender, sender);
        assert_eq!(body.actions, actions);
        assert_eq!(body.gas_limit, 1_000_000);

        let record = message.record();
        assert_eq!(record.id, message.id);
        assert_eq!(record.destination, 2);
    }

    proptest! {
        #[test]
        fn prop_message_id_is_deterministic(
            chain_id in any::<u64>(),
            executor in any::<[u8; 20]>(),
            nonce in any::<u64>(),
        ) {
            let executor = Address::from(executor);
            prop_assert_eq!(
                compute_message_id(chain_id, executor, nonce),
                compute_message_id(chain_id, executor, nonce)
            );
        }

        #[test]
        fn prop_message_id_changes_with_each_field(
            chain_id in any::<u64>(),
            executor in any::<[u8; 20]>(),
            nonce in any::<u64>(),
            flip in 0usize..20,
        ) {
            let executor = Address::from(executor);
            let mut other_executor = executor;
            other_executor.0[flip] ^= 0xff;

            let id = compute_message_id(chain_id, executor, nonce);
            prop_assert_ne!(id, compute_message_id(chain_id.wrapping_add(1), executor, nonce));
            prop_assert_ne!(id, compute_message_id(chain_id, other_executor, nonce));
            prop_assert_ne!(id, compute_message_id(chain_id, executor, nonce.wrapping_add(1)));
        }
    }
}
