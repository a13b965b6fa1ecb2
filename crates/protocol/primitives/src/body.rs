//! The wire encoding of a dispatched message.

use crate::{Action, DecodeError, DecodeResult, MessageEnvelope, MessageId};
use alloc::vec::Vec;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolType;
use derive_more::Constructor;

/// The decoded contents of a transport body.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct MessageBody {
    /// The original caller on the origin chain.
    pub sender: Address,
    /// The message identifier.
    pub id: MessageId,
    /// The actions, in execution order.
    pub actions: Vec<Action>,
    /// The declared gas budget.
    pub gas_limit: u64,
}

impl MessageBody {
    /// ABI-encodes the body as a [MessageEnvelope].
    pub fn encode(&self) -> Bytes {
        let envelope = MessageEnvelope {
            messageId: self.id,
            from: self.sender,
            gasLimit: U256::from(self.gas_limit),
            actions: self.actions.clone(),
        };
        MessageEnvelope::abi_encode(&envelope).into()
    }

    /// Decodes a transport body.
    ///
    /// Fails on truncated or malformed input, on trailing bytes past the canonical encoding, on an
    /// empty action list and on a gas limit that does not fit in a `u64`. Nothing is returned
    /// unless the whole body is valid.
    pub fn decode(data: &[u8]) -> DecodeResult<Self> {
        let envelope = MessageEnvelope::abi_decode_validate(data)?;

        let canonical = MessageEnvelope::abi_encode(&envelope);
        if canonical != data {
            return Err(DecodeError::NonCanonical { expected: canonical.len(), actual: data.len() });
        }
        if envelope.actions.is_empty() {
            return Err(DecodeError::EmptyBatch);
        }
        let gas_limit = u64::try_from(envelope.gasLimit)
            .map_err(|_| DecodeError::GasLimitOverflow(envelope.gasLimit))?;

        Ok(Self {
            sender: envelope.from,
            id: envelope.messageId,
            actions: envelope.actions,
            gas_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use proptest::prelude::*;
    use rstest::rstest;

    fn body(actions: Vec<Action>) -> MessageBody {
        MessageBody::new(Address::repeat_byte(0xaa), B256::repeat_byte(0xbb), actions, 1_000_000)
    }

    #[rstest]
    #[case::empty_payload(vec![Action::new(Address::repeat_byte(1), Bytes::new())])]
    #[case::single(vec![Action::new(Address::repeat_byte(1), vec![0xde_u8, 0xad, 0xbe, 0xef])])]
    #[case::batch(vec![
        Action::new(Address::repeat_byte(1), vec![1u8, 2, 3]),
        Action::new(Address::repeat_byte(2), Bytes::new()),
        Action::new(Address::repeat_byte(1), vec![0u8; 100]),
    ])]
    fn test_body_round_trip(#[case] actions: Vec<Action>) {
        let body = body(actions);
        let decoded = MessageBody::decode(&body.encode()).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_decode_rejects_truncated_body() {
        let encoded = body(vec![Action::new(Address::repeat_byte(1), vec![1u8, 2, 3])]).encode();
        for len in [0, 31, 32, encoded.len() / 2, encoded.len() - 1] {
            assert!(MessageBody::decode(&encoded[..len]).is_err(), "length {len} decoded");
        }
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut encoded = body(vec![Action::new(Address::repeat_byte(1), vec![1u8])]).encode().to_vec();
        let expected = encoded.len();
        encoded.extend_from_slice(&[0u8; 32]);

        let err = MessageBody::decode(&encoded).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::NonCanonical { expected: e, actual: a } if e == expected && a == expected + 32
        ));
    }

    #[test]
    fn test_decode_rejects_empty_batch() {
        let encoded = body(Vec::new()).encode();
        assert!(matches!(MessageBody::decode(&encoded), Err(DecodeError::EmptyBatch)));
    }

    #[test]
    fn test_decode_rejects_gas_overflow() {
        let envelope = MessageEnvelope {
            messageId: B256::ZERO,
            from: Address::ZERO,
            gasLimit: U256::from(u64::MAX) + U256::from(1),
            actions: vec![Action::new(Address::ZERO, Bytes::new())],
        };
        let encoded = MessageEnvelope::abi_encode(&envelope);
        assert!(matches!(MessageBody::decode(&encoded), Err(DecodeError::GasLimitOverflow(_))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(MessageBody::decode(b"HelloWorld"), Err(DecodeError::Abi(_))));
    }

    fn arb_action() -> impl Strategy<Value = Action> {
        (any::<[u8; 20]>(), proptest::collection::vec(any::<u8>(), 0..96))
            .prop_map(|(target, payload)| Action::new(Address::from(target), payload))
    }

    proptest! {
        #[test]
        fn prop_body_round_trip(
            sender in any::<[u8; 20]>(),
            id in any::<[u8; 32]>(),
            actions in proptest::collection::vec(arb_action(), 1..6),
            gas_limit in any::<u64>(),
        ) {
            let body = MessageBody::new(Address::from(sender), B256::from(id), actions, gas_limit);
            prop_assert_eq!(MessageBody::decode(&body.encode()).unwrap(), body);
        }
    }
}
