//! Message ID Subcommand

use alloy_primitives::{Address, ChainId};
use clap::Parser;
use xdm_primitives::compute_message_id;

/// The `message-id` Subcommand
///
/// Prints the identifier a dispatcher assigns to the message with `nonce` sent to `executor` on
/// `chain_id`.
///
/// # Usage
///
/// ```sh
/// xdm message-id --chain-id 2 --executor 0x00000000000000000000000000000000000000e0 --nonce 1
/// ```
#[derive(Parser, PartialEq, Debug, Clone)]
#[command(about = "Derives the identifier of a message.")]
pub struct MessageIdCommand {
    /// The destination chain.
    #[arg(long)]
    pub chain_id: ChainId,
    /// The executor on the destination chain.
    #[arg(long)]
    pub executor: Address,
    /// The message nonce.
    #[arg(long)]
    pub nonce: u64,
}

impl MessageIdCommand {
    /// Prints the message identifier.
    pub fn run(&self) -> anyhow::Result<()> {
        println!("{}", compute_message_id(self.chain_id, self.executor, self.nonce));
        Ok(())
    }
}
