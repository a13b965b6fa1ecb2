#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
pub use config::{DeploymentConfig, DispatcherConfig, ExecutorConfig, FailurePolicy, Route};

mod errors;
pub use errors::{DispatchError, DispatchResult, ExecutorError};

mod transport;
pub use transport::{DeliveryHandle, MessageRecipient, Transport};

mod mailbox;
pub use mailbox::{DeliveryError, Envelope, MAX_MESSAGE_BODY_BYTES, MailboxError, MockMailbox};

mod dispatcher;
pub use dispatcher::Dispatcher;

mod environment;
pub use environment::{CallEnvironment, CallResult, CallTarget, TargetRegistry};

mod outcome;
pub use outcome::{ActionFailure, ActionResult, ExecutionOutcome};

mod executor;
pub use executor::Executor;

mod targets;
pub use targets::{
    MessageTarget, RECEIVE_MESSAGE_GAS, RecordedCall, RecordingTarget, TargetError,
    receiveMessageCall,
};

mod deployment;
pub use deployment::LocalDeployment;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;
