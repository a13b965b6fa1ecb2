//! Construction-time configuration for the dispatcher and executor.
//!
//! Configuration is immutable for the lifetime of a component. Reconfiguring means building a new
//! instance.

use alloy_primitives::{Address, ChainId};
use derive_more::Constructor;

/// A destination the dispatcher can send to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Route {
    /// The destination chain.
    pub chain_id: ChainId,
    /// The executor on the destination chain. Message identifiers commit to this address.
    pub executor: Address,
    /// The transport's identifier for the destination, when it differs from the chain id.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub domain: Option<ChainId>,
}

impl Route {
    /// Creates a route the transport addresses by `chain_id`.
    pub const fn new(chain_id: ChainId, executor: Address) -> Self {
        Self { chain_id, executor, domain: None }
    }

    /// Sets the transport domain of the route.
    pub const fn with_domain(mut self, domain: ChainId) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Returns the destination as the transport knows it.
    ///
    /// Message identifiers and dispatch records always use [Route::chain_id].
    pub const fn transport_domain(&self) -> ChainId {
        match self.domain {
            Some(domain) => domain,
            None => self.chain_id,
        }
    }
}

/// Configuration for a [Dispatcher](crate::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DispatcherConfig {
    /// The dispatcher's own address, used as the emitter of dispatch logs.
    pub address: Address,
    /// The chain the dispatcher lives on.
    pub origin_chain_id: ChainId,
    /// Gas budget attached to messages dispatched without an explicit one.
    pub default_gas_limit: u64,
    /// Known destinations. The first route is the default destination.
    pub routes: Vec<Route>,
}

impl DispatcherConfig {
    /// Creates a configuration with a single route.
    pub fn new(
        address: Address,
        origin_chain_id: ChainId,
        destination: ChainId,
        executor: Address,
        default_gas_limit: u64,
    ) -> Self {
        Self {
            address,
            origin_chain_id,
            default_gas_limit,
            routes: vec![Route::new(destination, executor)],
        }
    }

    /// Adds another destination.
    pub fn with_route(mut self, chain_id: ChainId, executor: Address) -> Self {
        self.routes.push(Route::new(chain_id, executor));
        self
    }

    /// Adds another destination the transport addresses as `domain`.
    pub fn with_domain_route(
        mut self,
        chain_id: ChainId,
        domain: ChainId,
        executor: Address,
    ) -> Self {
        self.routes.push(Route::new(chain_id, executor).with_domain(domain));
        self
    }

    /// Returns the route for `chain_id`, if any.
    pub fn route(&self, chain_id: ChainId) -> Option<&Route> {
        self.routes.iter().find(|route| route.chain_id == chain_id)
    }

    /// Returns the default route.
    pub fn default_route(&self) -> Option<&Route> {
        self.routes.first()
    }
}

/// What the executor does with the rest of a batch once an action fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FailurePolicy {
    /// Record the failure and keep executing the remaining actions.
    #[default]
    Isolate,
    /// Record the failure and skip the remaining actions. Actions that already ran are not
    /// rolled back.
    AbortBatch,
}

/// Configuration for an [Executor](crate::Executor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExecutorConfig {
    /// The executor's own address. Targets see it as the caller of every forwarded action.
    pub address: Address,
    /// The only channel deliveries are accepted from.
    pub mailbox: Address,
    /// The only origin chain deliveries are accepted from.
    pub origin_chain_id: ChainId,
    /// Behaviour on a failing action.
    #[cfg_attr(feature = "serde", serde(default))]
    pub failure_policy: FailurePolicy,
}

/// A complete origin/destination pair, as loaded by deployment tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeploymentConfig {
    /// The origin chain.
    pub origin_chain_id: ChainId,
    /// The destination chain.
    pub destination_chain_id: ChainId,
    /// The dispatcher on the origin chain.
    pub dispatcher: Address,
    /// The mailbox delivering on the destination chain.
    pub mailbox: Address,
    /// The executor on the destination chain.
    pub executor: Address,
    /// Gas budget for messages without an explicit one.
    pub default_gas_limit: u64,
    /// Executor behaviour on a failing action.
    #[cfg_attr(feature = "serde", serde(default))]
    pub failure_policy: FailurePolicy,
}

impl DeploymentConfig {
    /// Returns the dispatcher side of the deployment.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig::new(
            self.dispatcher,
            self.origin_chain_id,
            self.destination_chain_id,
            self.executor,
            self.default_gas_limit,
        )
    }

    /// Returns the executor side of the deployment.
    pub const fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            address: self.executor,
            mailbox: self.mailbox,
            origin_chain_id: self.origin_chain_id,
            failure_policy: self.failure_policy,
        }
    }
}
