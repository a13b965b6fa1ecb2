//! Contains the xdm CLI.

use crate::commands::{MessageIdCommand, SendCommand};
use anyhow::Result;
use clap::{Parser, Subcommand};
use xdm_cli::{LogArgs, LogConfig};

/// Subcommands for the CLI.
#[derive(Debug, PartialEq, Clone, Subcommand)]
pub enum Commands {
    /// Derives the identifier of a message.
    #[command(alias = "id")]
    MessageId(MessageIdCommand),
    /// Dispatches a message through an in-process deployment and executes it.
    Send(SendCommand),
}

/// The xdm CLI.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub subcommand: Commands,
    /// Global logging arguments.
    #[command(flatten)]
    pub global: LogArgs,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.init_logs()?;

        match self.subcommand {
            Commands::MessageId(command) => command.run(),
            Commands::Send(command) => command.run(),
        }
    }

    /// Initializes the tracing subscriber.
    pub fn init_logs(&self) -> Result<()> {
        LogConfig::new(self.global.clone()).init_tracing_subscriber(None)?;
        Ok(())
    }
}
