//! Traits at the transport boundary.

use alloy_primitives::{Address, Bytes, ChainId};
use derive_more::{Display, From};

/// Opaque handle returned by a [Transport] for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct DeliveryHandle(pub u64);

/// The origin side of a point-to-point channel.
///
/// Implementations deliver at least once and preserve the submission order of each sender.
pub trait Transport {
    /// The error returned when a submission is refused.
    type Error: core::error::Error;

    /// Submits `payload` for delivery to `recipient` on `destination`.
    fn send(
        &mut self,
        destination: ChainId,
        recipient: Address,
        payload: Bytes,
    ) -> Result<DeliveryHandle, Self::Error>;
}

/// The destination side of a channel: whatever a delivery is handed to.
pub trait MessageRecipient {
    /// The error returned when a delivery is refused.
    type Error: core::error::Error;

    /// The address deliveries are addressed to.
    fn address(&self) -> Address;

    /// Handles a delivered `body` sent from `origin`, arriving through `channel`.
    fn handle(
        &mut self,
        origin: ChainId,
        channel: Address,
        body: &[u8],
    ) -> Result<(), Self::Error>;
}
