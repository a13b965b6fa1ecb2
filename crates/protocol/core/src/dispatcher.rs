//! The origin side of the protocol.

use crate::{DispatchError, DispatchResult, DispatcherConfig, Route, Transport};
use alloy_primitives::{Address, Bytes, ChainId, Log, map::HashMap};
use tracing::{info, warn};
use xdm_primitives::{Action, DispatchRecord, Message, MessageId, NONCE_START};

/// Turns caller intent into uniquely identified, ordered messages and hands them to a
/// [Transport].
///
/// The dispatcher owns one nonce counter per destination chain. A counter only moves when the
/// transport accepts a submission, so the nonces of successful dispatches to a destination are
/// exactly `1..=n`.
#[derive(Debug)]
pub struct Dispatcher<T> {
    /// The static configuration.
    config: DispatcherConfig,
    /// The channel messages are submitted to.
    transport: T,
    /// Last nonce used, per destination chain.
    nonces: HashMap<ChainId, u64>,
    /// Records emitted and not yet drained. Grows with every accepted dispatch until
    /// [Dispatcher::drain_records] is called.
    records: Vec<DispatchRecord>,
}

impl<T: Transport> Dispatcher<T> {
    /// Creates a new [Dispatcher] submitting to `transport`.
    pub fn new(config: DispatcherConfig, transport: T) -> Self {
        Self { config, transport, nonces: HashMap::default(), records: Vec::new() }
    }

    /// Dispatches `actions` from `sender` to the default destination.
    ///
    /// A `gas_limit` of `None` attaches the configured default budget.
    pub fn dispatch(
        &mut self,
        sender: Address,
        actions: Vec<Action>,
        gas_limit: Option<u64>,
    ) -> DispatchResult<MessageId, T::Error> {
        let route = *self.config.default_route().ok_or(DispatchError::NoRoutes)?;
        self.dispatch_on(route, sender, actions, gas_limit)
    }

    /// Dispatches `actions` from `sender` to `to_chain_id`.
    pub fn dispatch_batch(
        &mut self,
        sender: Address,
        to_chain_id: ChainId,
        actions: Vec<Action>,
        gas_limit: Option<u64>,
    ) -> DispatchResult<MessageId, T::Error> {
        let route = *self
            .config
            .route(to_chain_id)
            .ok_or(DispatchError::UnsupportedDestination(to_chain_id))?;
        self.dispatch_on(route, sender, actions, gas_limit)
    }

    /// Dispatches a single call of `target` with `data` from `sender` to `to_chain_id`, with the
    /// default gas budget.
    pub fn dispatch_message(
        &mut self,
        sender: Address,
        to_chain_id: ChainId,
        target: Address,
        data: Bytes,
    ) -> DispatchResult<MessageId, T::Error> {
        self.dispatch_batch(sender, to_chain_id, vec![Action::new(target, data)], None)
    }

    fn dispatch_on(
        &mut self,
        route: Route,
        sender: Address,
        actions: Vec<Action>,
        gas_limit: Option<u64>,
    ) -> DispatchResult<MessageId, T::Error> {
        if actions.is_empty() {
            return Err(DispatchError::EmptyBatch);
        }

        let nonce = match self.nonces.get(&route.chain_id) {
            Some(last) => {
                last.checked_add(1).ok_or(DispatchError::NonceOverflow(route.chain_id))?
            }
            None => NONCE_START,
        };

        let gas_limit = gas_limit.unwrap_or(self.config.default_gas_limit);
        let message =
            Message::new(route.chain_id, route.executor, sender, nonce, actions, gas_limit);

        if let Err(err) =
            self.transport.send(route.transport_domain(), route.executor, message.body().encode())
        {
            warn!(
                target: "dispatcher",
                destination = route.chain_id,
                nonce,
                %err,
                "Transport rejected message",
            );
            #[cfg(feature = "metrics")]
            metrics::counter!(crate::Metrics::DISPATCH_REJECTED).increment(1);
            return Err(DispatchError::TransportRejected(err));
        }

        // Commit only once the transport has accepted the submission.
        self.nonces.insert(route.chain_id, nonce);

        info!(
            target: "dispatcher",
            message_id = %message.id,
            %sender,
            origin = self.config.origin_chain_id,
            destination = route.chain_id,
            nonce,
            num_actions = message.actions.len(),
            gas_limit,
            "Dispatched message",
        );
        #[cfg(feature = "metrics")]
        metrics::counter!(crate::Metrics::MESSAGES_DISPATCHED).increment(1);

        let id = message.id;
        self.records.push(message.record());
        Ok(id)
    }

    /// Returns the last nonce used for `chain_id`, or `0` if nothing was dispatched there.
    pub fn nonce(&self, chain_id: ChainId) -> u64 {
        self.nonces.get(&chain_id).copied().unwrap_or_default()
    }

    /// Returns the executor messages to `chain_id` are addressed to.
    pub fn executor_address(&self, chain_id: ChainId) -> Option<Address> {
        self.config.route(chain_id).map(|route| route.executor)
    }

    /// Returns the records emitted and not yet drained, oldest first.
    ///
    /// Every accepted dispatch appends one record and nothing is evicted. A long-lived dispatcher
    /// must call [Dispatcher::drain_records] after forwarding the records, or the buffer keeps
    /// every record it ever emitted.
    pub fn records(&self) -> &[DispatchRecord] {
        &self.records
    }

    /// Returns the pending records in their ERC-5164 log encoding, emitted by the dispatcher's
    /// address.
    pub fn logs(&self) -> Vec<Log> {
        self.records.iter().map(|record| record.to_log(self.config.address)).collect()
    }

    /// Takes the records emitted so far, oldest first.
    pub fn drain_records(&mut self) -> Vec<DispatchRecord> {
        core::mem::take(&mut self.records)
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Returns the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the transport mutably.
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeliveryHandle, MailboxError, MockMailbox};
    use xdm_primitives::{MessageBody, compute_message_id};

    const ORIGIN: ChainId = 1;
    const DESTINATION: ChainId = 2;

    fn executor() -> Address {
        Address::repeat_byte(0xe0)
    }

    fn dispatcher() -> Dispatcher<MockMailbox> {
        let config =
            DispatcherConfig::new(Address::repeat_byte(0xd0), ORIGIN, DESTINATION, executor(), 500)
                .with_route(3, Address::repeat_byte(0xe3));
        // The mailbox only serves the first destination.
        Dispatcher::new(config, MockMailbox::new(ORIGIN, DESTINATION, Address::repeat_byte(0xbb)))
    }

    fn action() -> Action {
        Action::new(Address::repeat_byte(0x70), Bytes::from_static(b"ping"))
    }

    #[test]
    fn test_nonces_are_sequential() {
        let mut dispatcher = dispatcher();
        let sender = Address::repeat_byte(0x01);

        for expected in 1..=10 {
            let id = dispatcher.dispatch(sender, vec![action()], None).unwrap();
            assert_eq!(dispatcher.nonce(DESTINATION), expected);
            assert_eq!(id, compute_message_id(DESTINATION, executor(), expected));
        }

        let records = dispatcher.drain_records();
        assert_eq!(records.len(), 10);
        assert!(dispatcher.records().is_empty());
        assert_eq!(dispatcher.transport().pending_count(), 10);
    }

    #[test]
    fn test_records_accumulate_until_drained() {
        let mut dispatcher = dispatcher();
        dispatcher.dispatch(Address::ZERO, vec![action()], None).unwrap();
        dispatcher.dispatch(Address::ZERO, vec![action()], None).unwrap();
        assert_eq!(dispatcher.records().len(), 2);
        assert_eq!(dispatcher.logs().len(), 2);

        let drained = dispatcher.drain_records();
        assert_eq!(
            drained.iter().map(|record| record.id).collect::<Vec<_>>(),
            vec![
                compute_message_id(DESTINATION, executor(), 1),
                compute_message_id(DESTINATION, executor(), 2)
            ]
        );
        assert!(dispatcher.records().is_empty());
        assert!(dispatcher.logs().is_empty());

        // Draining releases the buffer without touching the nonce counter.
        dispatcher.dispatch(Address::ZERO, vec![action()], None).unwrap();
        assert_eq!(dispatcher.records().len(), 1);
        assert_eq!(dispatcher.records()[0].id, compute_message_id(DESTINATION, executor(), 3));
    }

    #[test]
    fn test_transport_domain_differs_from_chain_id() {
        const DOMAIN: ChainId = 0x6574_6865;
        let config = DispatcherConfig {
            address: Address::repeat_byte(0xd0),
            origin_chain_id: ORIGIN,
            default_gas_limit: 0,
            routes: vec![Route::new(DESTINATION, executor()).with_domain(DOMAIN)],
        };
        let mut dispatcher =
            Dispatcher::new(config, MockMailbox::new(ORIGIN, DOMAIN, Address::repeat_byte(0xbb)));

        let id = dispatcher.dispatch(Address::ZERO, vec![action()], None).unwrap();

        // Identifiers and records use the chain id, the transport sees the domain.
        assert_eq!(id, compute_message_id(DESTINATION, executor(), 1));
        assert_eq!(dispatcher.nonce(DESTINATION), 1);
        assert_eq!(dispatcher.records()[0].destination, DESTINATION);
        let envelope = dispatcher.transport().envelope(DeliveryHandle(0)).unwrap();
        assert_eq!(envelope.destination, DOMAIN);
    }

    #[test]
    fn test_nonce_overflow() {
        let mut dispatcher = dispatcher();
        dispatcher.nonces.insert(DESTINATION, u64::MAX);

        assert_eq!(
            dispatcher.dispatch(Address::ZERO, vec![action()], None),
            Err(DispatchError::NonceOverflow(DESTINATION))
        );
        assert_eq!(dispatcher.nonce(DESTINATION), u64::MAX);
        assert!(dispatcher.records().is_empty());
        assert_eq!(dispatcher.transport().pending_count(), 0);
        assert!(dispatcher.transport().envelope(DeliveryHandle(0)).is_none());
    }

    #[test]
    fn test_dispatch_hands_encoded_body_to_transport() {
        let mut dispatcher = dispatcher();
        let sender = Address::repeat_byte(0x01);
        let id = dispatcher.dispatch(sender, vec![action(), action()], Some(42)).unwrap();

        let envelope = dispatcher.transport().envelope(DeliveryHandle(0)).unwrap().clone();
        assert_eq!(envelope.recipient, executor());
        assert_eq!(envelope.destination, DESTINATION);
        assert_eq!(
            MessageBody::decode(&envelope.body).unwrap(),
            MessageBody::new(sender, id, vec![action(), action()], 42)
        );

        let record = &dispatcher.records()[0];
        let logs = dispatcher.logs();
        assert_eq!(logs[0].address, Address::repeat_byte(0xd0));
        assert_eq!(logs[0].topics()[1], id);
        assert_eq!(record.id, id);
        assert_eq!(record.sender, sender);
        assert_eq!(record.destination, DESTINATION);
        assert_eq!(record.gas_limit, 42);
    }

    #[test]
    fn test_default_gas_limit() {
        let mut dispatcher = dispatcher();
        dispatcher
            .dispatch_message(Address::ZERO, DESTINATION, Address::repeat_byte(1), Bytes::new())
            .unwrap();
        assert_eq!(dispatcher.records()[0].gas_limit, 500);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut dispatcher = dispatcher();
        assert_eq!(
            dispatcher.dispatch(Address::ZERO, Vec::new(), None),
            Err(DispatchError::EmptyBatch)
        );
        assert_eq!(dispatcher.nonce(DESTINATION), 0);
    }

    #[test]
    fn test_unsupported_destination() {
        let mut dispatcher = dispatcher();
        assert_eq!(
            dispatcher.dispatch_batch(Address::ZERO, 9, vec![action()], None),
            Err(DispatchError::UnsupportedDestination(9))
        );
        assert_eq!(dispatcher.executor_address(3), Some(Address::repeat_byte(0xe3)));
        assert_eq!(dispatcher.executor_address(9), None);
    }

    #[test]
    fn test_no_routes() {
        let config = DispatcherConfig {
            address: Address::ZERO,
            origin_chain_id: ORIGIN,
            default_gas_limit: 0,
            routes: Vec::new(),
        };
        let mut dispatcher =
            Dispatcher::new(config, MockMailbox::new(ORIGIN, DESTINATION, Address::ZERO));
        assert_eq!(
            dispatcher.dispatch(Address::ZERO, vec![action()], None),
            Err(DispatchError::NoRoutes)
        );
    }

    #[test]
    fn test_transport_rejection_consumes_no_nonce() {
        let mut dispatcher = dispatcher();

        // Route 3 exists, but the mailbox does not serve it.
        assert_eq!(
            dispatcher.dispatch_batch(Address::ZERO, 3, vec![action()], None),
            Err(DispatchError::TransportRejected(MailboxError::UnknownDestination(3)))
        );
        assert_eq!(dispatcher.nonce(3), 0);

        let oversized = Action::new(Address::repeat_byte(1), vec![0u8; 4096]);
        assert!(matches!(
            dispatcher.dispatch(Address::ZERO, vec![oversized], None),
            Err(DispatchError::TransportRejected(MailboxError::BodyTooLarge { .. }))
        ));
        assert_eq!(dispatcher.nonce(DESTINATION), 0);
        assert!(dispatcher.records().is_empty());

        // The next successful dispatch still gets nonce 1.
        let id = dispatcher.dispatch(Address::ZERO, vec![action()], None).unwrap();
        assert_eq!(id, compute_message_id(DESTINATION, executor(), 1));
    }
}
