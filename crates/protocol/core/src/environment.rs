//! The destination-side execution environment the executor forwards actions into.

use alloy_primitives::{Address, Bytes, map::HashMap};
use core::any::Any;

/// The result of invoking a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResult {
    /// The call succeeded.
    Success {
        /// Gas consumed by the call.
        gas_used: u64,
    },
    /// The call reverted.
    Revert {
        /// Gas consumed before reverting.
        gas_used: u64,
        /// Revert data returned by the target.
        data: Bytes,
    },
    /// The call ran out of gas. All gas handed to it is consumed.
    OutOfGas,
}

/// A contract-like recipient of forwarded actions.
pub trait CallTarget: Any {
    /// Handles a call from `caller` with `calldata`, spending at most `gas_limit`.
    fn call(&mut self, caller: Address, calldata: &[u8], gas_limit: u64) -> CallResult;
}

/// Resolves and invokes action targets.
pub trait CallEnvironment {
    /// Calls `target` from `caller`. Returns `None` if nothing lives at `target`.
    fn call(
        &mut self,
        caller: Address,
        target: Address,
        calldata: &[u8],
        gas_limit: u64,
    ) -> Option<CallResult>;
}

/// A [CallEnvironment] backed by a map of boxed [CallTarget]s.
#[derive(Default)]
pub struct TargetRegistry {
    targets: HashMap<Address, Box<dyn CallTarget>>,
}

impl core::fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TargetRegistry").field("targets", &self.targets.keys()).finish()
    }
}

impl TargetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `target` at `address`, replacing whatever lived there.
    pub fn insert(&mut self, address: Address, target: impl CallTarget) {
        self.targets.insert(address, Box::new(target));
    }

    /// Builder-style [`Self::insert`].
    pub fn with_target(mut self, address: Address, target: impl CallTarget) -> Self {
        self.insert(address, target);
        self
    }

    /// Returns the target at `address` if it is a `T`.
    pub fn get<T: CallTarget>(&self, address: Address) -> Option<&T> {
        let target: &dyn Any = &**self.targets.get(&address)?;
        target.downcast_ref()
    }

    /// Returns the target at `address` mutably if it is a `T`.
    pub fn get_mut<T: CallTarget>(&mut self, address: Address) -> Option<&mut T> {
        let target: &mut dyn Any = &mut **self.targets.get_mut(&address)?;
        target.downcast_mut()
    }

    /// Returns `true` if a target lives at `address`.
    pub fn contains(&self, address: Address) -> bool {
        self.targets.contains_key(&address)
    }
}

impl CallEnvironment for TargetRegistry {
    fn call(
        &mut self,
        caller: Address,
        target: Address,
        calldata: &[u8],
        gas_limit: u64,
    ) -> Option<CallResult> {
        self.targets.get_mut(&target).map(|target| target.call(caller, calldata, gas_limit))
    }
}
