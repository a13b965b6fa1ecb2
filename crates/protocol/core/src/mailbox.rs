//! An in-memory mailbox standing in for the point-to-point transport.
//!
//! One [MockMailbox] models both ends of a channel: the outbox on the origin chain accepting
//! submissions, and the inbox on the destination chain delivering them. Envelopes are delivered
//! strictly in submission order. A delivery the recipient refuses stays at the head of the queue,
//! and any delivered envelope can be delivered again to simulate duplication.

use crate::{DeliveryHandle, MessageRecipient, Transport};
use alloy_primitives::{Address, Bytes, ChainId};
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;
use tracing::{debug, warn};

/// Largest body the mailbox accepts, matching the Hyperlane v1 outbox.
pub const MAX_MESSAGE_BODY_BYTES: usize = 2 * 1024;

/// A submission held by the mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// The handle assigned on submission.
    pub handle: DeliveryHandle,
    /// The chain the envelope was sent from.
    pub origin: ChainId,
    /// The chain the envelope is sent to.
    pub destination: ChainId,
    /// The recipient on the destination chain.
    pub recipient: Address,
    /// The opaque body.
    pub body: Bytes,
}

/// An error returned by [MockMailbox] submissions and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailboxError {
    /// The recipient is the zero address.
    #[error("Recipient is the zero address")]
    ZeroRecipient,
    /// The body exceeds [MAX_MESSAGE_BODY_BYTES].
    #[error("Message body too large. Max {max} bytes, got {actual}")]
    BodyTooLarge {
        /// The maximum body size
        max: usize,
        /// The submitted body size
        actual: usize,
    },
    /// The destination is not served by this mailbox.
    #[error("Unknown destination chain ID {0}")]
    UnknownDestination(ChainId),
    /// No envelope was ever submitted under the handle.
    #[error("Unknown delivery handle {0}")]
    UnknownHandle(DeliveryHandle),
    /// The envelope is addressed to another recipient.
    #[error("Envelope is addressed to {expected}, not {actual}")]
    RecipientMismatch {
        /// The envelope's recipient
        expected: Address,
        /// The recipient it was handed to
        actual: Address,
    },
}

/// An error returned when delivering an envelope.
#[derive(Debug, Error)]
pub enum DeliveryError<E> {
    /// The mailbox could not deliver the envelope.
    #[error(transparent)]
    Mailbox(#[from] MailboxError),
    /// The recipient refused the envelope.
    #[error("Recipient refused delivery: {0}")]
    Recipient(#[source] E),
}

/// An in-memory, in-order, at-least-once mailbox.
#[derive(Debug, Clone)]
pub struct MockMailbox {
    /// The chain submissions originate from.
    origin: ChainId,
    /// The destination chain served by this mailbox.
    destination: ChainId,
    /// The identity deliveries arrive through on the destination chain.
    address: Address,
    /// Every envelope ever accepted, by handle.
    envelopes: BTreeMap<DeliveryHandle, Envelope>,
    /// Handles awaiting delivery, in submission order.
    pending: VecDeque<DeliveryHandle>,
    /// The next handle to assign.
    next_handle: u64,
}

impl MockMailbox {
    /// Creates a mailbox carrying messages from `origin` to `destination`, delivering through
    /// `address`.
    pub const fn new(origin: ChainId, destination: ChainId, address: Address) -> Self {
        Self {
            origin,
            destination,
            address,
            envelopes: BTreeMap::new(),
            pending: VecDeque::new(),
            next_handle: 0,
        }
    }

    /// Returns the identity deliveries arrive through.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the number of envelopes awaiting delivery.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns the envelope submitted under `handle`.
    pub fn envelope(&self, handle: DeliveryHandle) -> Option<&Envelope> {
        self.envelopes.get(&handle)
    }

    /// Returns the body submitted under `handle`.
    pub fn deliver(&self, handle: DeliveryHandle) -> Result<Bytes, MailboxError> {
        self.envelope(handle)
            .map(|envelope| envelope.body.clone())
            .ok_or(MailboxError::UnknownHandle(handle))
    }

    /// Delivers the oldest pending envelope to `recipient`.
    ///
    /// Returns `Ok(None)` if nothing is pending. If the recipient refuses the envelope, it stays
    /// pending and the error is returned.
    pub fn process_next_pending<R: MessageRecipient>(
        &mut self,
        recipient: &mut R,
    ) -> Result<Option<DeliveryHandle>, DeliveryError<R::Error>> {
        let Some(handle) = self.pending.front().copied() else {
            return Ok(None);
        };

        self.hand_over(handle, recipient)?;
        self.pending.pop_front();
        Ok(Some(handle))
    }

    /// Delivers every pending envelope to `recipient`, stopping at the first refusal.
    ///
    /// Returns the handles delivered.
    pub fn process_all_pending<R: MessageRecipient>(
        &mut self,
        recipient: &mut R,
    ) -> Result<Vec<DeliveryHandle>, DeliveryError<R::Error>> {
        let mut delivered = Vec::with_capacity(self.pending.len());
        while let Some(handle) = self.process_next_pending(recipient)? {
            delivered.push(handle);
        }
        Ok(delivered)
    }

    /// Delivers the envelope submitted under `handle` again, whether or not it was delivered
    /// before.
    pub fn redeliver<R: MessageRecipient>(
        &self,
        handle: DeliveryHandle,
        recipient: &mut R,
    ) -> Result<(), DeliveryError<R::Error>> {
        warn!(target: "mailbox", %handle, "Redelivering envelope");
        self.hand_over(handle, recipient)
    }

    fn hand_over<R: MessageRecipient>(
        &self,
        handle: DeliveryHandle,
        recipient: &mut R,
    ) -> Result<(), DeliveryError<R::Error>> {
        let envelope = self.envelopes.get(&handle).ok_or(MailboxError::UnknownHandle(handle))?;
        if envelope.recipient != recipient.address() {
            return Err(MailboxError::RecipientMismatch {
                expected: envelope.recipient,
                actual: recipient.address(),
            }
            .into());
        }

        debug!(
            target: "mailbox",
            %handle,
            origin = envelope.origin,
            recipient = %envelope.recipient,
            len = envelope.body.len(),
            "Delivering envelope",
        );
        recipient
            .handle(envelope.origin, self.address, &envelope.body)
            .map_err(DeliveryError::Recipient)
    }
}

impl Transport for MockMailbox {
    type Error = MailboxError;

    fn send(
        &mut self,
        destination: ChainId,
        recipient: Address,
        payload: Bytes,
    ) -> Result<DeliveryHandle, Self::Error> {
        if destination != self.destination {
            return Err(MailboxError::UnknownDestination(destination));
        }
        if recipient.is_zero() {
            return Err(MailboxError::ZeroRecipient);
        }
        if payload.len() > MAX_MESSAGE_BODY_BYTES {
            return Err(MailboxError::BodyTooLarge {
                max: MAX_MESSAGE_BODY_BYTES,
                actual: payload.len(),
            });
        }

        let handle = DeliveryHandle(self.next_handle);
        self.next_handle += 1;

        debug!(
            target: "mailbox",
            %handle,
            destination,
            %recipient,
            len = payload.len(),
            "Accepted envelope",
        );
        self.envelopes.insert(
            handle,
            Envelope { handle, origin: self.origin, destination, recipient, body: payload },
        );
        self.pending.push_back(handle);
        Ok(handle)
    }
}
