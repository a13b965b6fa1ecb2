//! Error types for the `xdm-core` crate.

use alloy_primitives::{Address, ChainId};
use thiserror::Error;
use xdm_primitives::DecodeError;

/// An error returned by [Dispatcher](crate::Dispatcher) operations.
///
/// None of these leave an observable trace: the nonce is only consumed once the transport has
/// accepted the submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError<E> {
    /// The batch carries no actions.
    #[error("Cannot dispatch an empty batch")]
    EmptyBatch,
    /// No route has been configured.
    #[error("Dispatcher has no routes configured")]
    NoRoutes,
    /// No executor is configured for the destination chain.
    #[error("No executor configured for chain ID {0}")]
    UnsupportedDestination(ChainId),
    /// The nonce counter for the destination chain is exhausted.
    #[error("Nonce exhausted for chain ID {0}")]
    NonceOverflow(ChainId),
    /// The transport refused the submission.
    #[error("Transport rejected submission: {0}")]
    TransportRejected(#[source] E),
}

/// A [Result] alias for the [DispatchError] type.
pub type DispatchResult<T, E> = core::result::Result<T, DispatchError<E>>;

/// An error returned when the [Executor](crate::Executor) refuses a delivery.
///
/// All variants are detected before any action runs.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The delivery did not come through the trusted mailbox.
    #[error("Untrusted channel. Expected {expected}, got {actual}")]
    UntrustedChannel {
        /// The trusted mailbox
        expected: Address,
        /// The channel the delivery came through
        actual: Address,
    },
    /// The delivery did not come from the expected origin chain.
    #[error("Unexpected origin. Expected chain ID {expected}, got {actual}")]
    UnexpectedOrigin {
        /// The expected origin chain ID
        expected: ChainId,
        /// The origin chain ID of the delivery
        actual: ChainId,
    },
    /// The body is not a valid message envelope.
    #[error("Failed to decode message: {0}")]
    Decode(#[from] DecodeError),
}
