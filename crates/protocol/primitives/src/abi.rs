//! Solidity types shared by both ends of the channel.

use alloy_sol_types::sol;

sol! {
    /// @notice A single call forwarded to `target` on the destination chain.
    #[derive(Default, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    struct Action {
        address target;
        bytes payload;
    }

    /// @notice The envelope the dispatcher hands to the transport.
    /// @param messageId Identifier derived from the destination, executor and nonce.
    /// @param from      Original caller on the origin chain.
    /// @param gasLimit  Gas budget for executing every action. Zero leaves it to the executor.
    /// @param actions   Calls to execute, in order.
    #[derive(Default, Debug, PartialEq, Eq)]
    struct MessageEnvelope {
        bytes32 messageId;
        address from;
        uint256 gasLimit;
        Action[] actions;
    }

    /// @notice Emitted when a single call is dispatched.
    #[derive(Default, Debug, PartialEq, Eq)]
    event MessageDispatched(
        bytes32 indexed messageId,
        address indexed from,
        uint256 indexed toChainId,
        address to,
        bytes data
    );

    /// @notice Emitted when a batch of calls is dispatched.
    #[derive(Default, Debug, PartialEq, Eq)]
    event MessageBatchDispatched(
        bytes32 indexed messageId,
        address indexed from,
        uint256 indexed toChainId,
        Action[] messages
    );

    /// @notice Emitted by executors that acknowledge execution on-chain.
    #[derive(Default, Debug, PartialEq, Eq)]
    event MessageIdExecuted(uint256 indexed fromChainId, bytes32 indexed messageId);
}
