//! Constants for the cross-domain dispatch protocol.

/// The nonce assigned to the first message dispatched to a destination.
pub const NONCE_START: u64 = 1;

/// Length of the packed `(uint256 chainId, address executor, uint256 nonce)` tuple that is hashed
/// into a [MessageId](crate::MessageId).
pub const MESSAGE_ID_PREIMAGE_LEN: usize = 32 + 20 + 32;

/// Length of the `(bytes32 messageId, uint256 fromChainId, address from)` suffix the executor
/// appends to every forwarded call.
///
/// <https://eips.ethereum.org/EIPS/eip-5164#messageexecutor>
pub const EXECUTION_CONTEXT_LEN: usize = 32 + 32 + 20;

/// Gas ceiling applied to a message that does not declare a budget, and the upper bound for any
/// declared budget.
pub const MAX_EXECUTION_GAS: u64 = 100_000_000_000;
