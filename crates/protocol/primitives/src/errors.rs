//! Error types for the `xdm-primitives` crate.

use alloy_primitives::U256;
use thiserror::Error;

/// An error produced while decoding a transport body into a [MessageBody].
///
/// [MessageBody]: crate::MessageBody
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not a valid ABI encoding of a message envelope.
    #[error("Malformed message envelope: {0}")]
    Abi(#[from] alloy_sol_types::Error),
    /// The body decodes, but carries bytes beyond the canonical encoding.
    #[error("Non-canonical message envelope. Expected {expected} bytes, got {actual}")]
    NonCanonical {
        /// Length of the canonical encoding
        expected: usize,
        /// Length of the received body
        actual: usize,
    },
    /// The envelope carries no actions.
    #[error("Message envelope carries no actions")]
    EmptyBatch,
    /// The declared gas limit does not fit in a `u64`.
    #[error("Gas limit {0} exceeds u64")]
    GasLimitOverflow(U256),
    /// The log is not a dispatch event.
    #[error("Log is not a dispatch event")]
    NotADispatchLog,
}

/// A [Result] alias for the [DecodeError] type.
pub type DecodeResult<T> = core::result::Result<T, DecodeError>;
