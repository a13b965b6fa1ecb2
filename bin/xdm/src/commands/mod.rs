//! Subcommands for the `xdm` binary.

mod message_id;
pub use message_id::MessageIdCommand;

mod send;
pub use send::SendCommand;
