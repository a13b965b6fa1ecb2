#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod constants;
pub use constants::{
    EXECUTION_CONTEXT_LEN, MAX_EXECUTION_GAS, MESSAGE_ID_PREIMAGE_LEN, NONCE_START,
};

mod abi;
pub use abi::{
    Action, MessageBatchDispatched, MessageDispatched, MessageEnvelope, MessageIdExecuted,
};

mod message;
pub use message::{Message, MessageId, compute_message_id, message_id_preimage};

mod body;
pub use body::MessageBody;

mod context;
pub use context::ExecutionContext;

mod event;
pub use event::{DispatchRecord, parse_dispatch_log};

mod errors;
pub use errors::{DecodeError, DecodeResult};
