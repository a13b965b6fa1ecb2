//! Send Subcommand

use alloy_primitives::Address;
use anyhow::{Context as _, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use xdm_core::{DeploymentConfig, ExecutionOutcome, LocalDeployment, MessageTarget};
use xdm_primitives::{Action, MessageId};

/// Where the `receiveMessage` target is deployed unless told otherwise.
const DEFAULT_TARGET: &str = "0x000000000000000000000000000000000000beef";

/// Who sends the message unless told otherwise.
const DEFAULT_SENDER: &str = "0x0000000000000000000000000000000000000001";

/// The `send` Subcommand
///
/// Wires a dispatcher and an executor together through an in-memory mailbox, dispatches a
/// `receiveMessage(message)` call to a target on the destination chain and executes it.
///
/// # Usage
///
/// ```sh
/// xdm send --config deployment.json --message HelloWorld
/// ```
#[derive(Parser, PartialEq, Debug, Clone)]
#[command(about = "Dispatches a message through an in-process deployment and executes it.")]
pub struct SendCommand {
    /// Path to the deployment JSON file.
    #[arg(long, short = 'c', env = "XDM_DEPLOYMENT")]
    pub config: PathBuf,
    /// The message handed to the target.
    #[arg(long, short = 'm', default_value = "HelloWorld")]
    pub message: String,
    /// The caller on the origin chain.
    #[arg(long, default_value = DEFAULT_SENDER)]
    pub sender: Address,
    /// Where the target lives on the destination chain.
    #[arg(long, default_value = DEFAULT_TARGET)]
    pub target: Address,
    /// Gas budget for the message. Defaults to the deployment's default.
    #[arg(long)]
    pub gas_limit: Option<u64>,
}

/// What a [SendCommand] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SendReport {
    /// The identifier assigned by the dispatcher.
    pub(crate) message_id: MessageId,
    /// The nonce assigned by the dispatcher.
    pub(crate) nonce: u64,
    /// The executor's outcome.
    pub(crate) outcome: ExecutionOutcome,
    /// The message the target recorded.
    pub(crate) received_message: String,
    /// The sender the target recorded.
    pub(crate) received_sender: Option<Address>,
}

impl SendCommand {
    /// Runs the subcommand and prints the report.
    pub fn run(&self) -> Result<()> {
        let config = read_json_file::<DeploymentConfig>(&self.config)?;
        let report = self.execute(&config)?;

        println!("Message ID: {}", report.message_id);
        println!("Nonce: {}", report.nonce);
        println!("Gas used: {}", report.outcome.gas_used());
        println!("Target received: {:?}", report.received_message);
        if let Some(sender) = report.received_sender {
            println!("Target saw sender: {sender}");
        }

        if !report.outcome.all_succeeded() {
            bail!("{} action(s) failed: {:?}", report.outcome.failure_count(), report.outcome.results);
        }
        Ok(())
    }

    /// Dispatches and executes the message against a fresh deployment built from `config`.
    pub(crate) fn execute(&self, config: &DeploymentConfig) -> Result<SendReport> {
        let mut deployment = LocalDeployment::new(config)
            .with_target(self.target, MessageTarget::new(config.executor));

        let action = Action::new(self.target, MessageTarget::calldata(&self.message));
        let message_id = deployment.dispatcher.dispatch_batch(
            self.sender,
            config.destination_chain_id,
            vec![action],
            self.gas_limit,
        )?;
        let nonce = deployment.dispatcher.nonce(config.destination_chain_id);
        info!(target: "send", %message_id, nonce, "Dispatched message");

        let delivered = deployment.process_all_pending()?;
        info!(target: "send", delivered = delivered.len(), "Processed pending deliveries");

        let outcome =
            deployment.executor.last_outcome().cloned().context("Executor processed no message")?;
        let target = deployment
            .target::<MessageTarget>(self.target)
            .context("Target missing from the deployment")?;

        Ok(SendReport {
            message_id,
            nonce,
            outcome,
            received_message: target.last_message.clone(),
            received_sender: target.last_sender,
        })
    }
}

/// Reads and parses a JSON file.
fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON from '{}'", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use xdm_core::FailurePolicy;
    use xdm_primitives::compute_message_id;

    const DEPLOYMENT: &str = r#"{
        "originChainId": 1,
        "destinationChainId": 2,
        "dispatcher": "0x00000000000000000000000000000000000000d0",
        "mailbox": "0x00000000000000000000000000000000000000bb",
        "executor": "0x00000000000000000000000000000000000000e0",
        "defaultGasLimit": 1000000
    }"#;

    fn command(config: PathBuf) -> SendCommand {
        SendCommand {
            config,
            message: "HelloWorld".to_string(),
            sender: DEFAULT_SENDER.parse().unwrap(),
            target: DEFAULT_TARGET.parse().unwrap(),
            gas_limit: None,
        }
    }

    #[test]
    fn test_read_deployment() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DEPLOYMENT.as_bytes()).unwrap();

        let config = read_json_file::<DeploymentConfig>(file.path()).unwrap();
        assert_eq!(config.origin_chain_id, 1);
        assert_eq!(config.destination_chain_id, 2);
        assert_eq!(config.default_gas_limit, 1_000_000);
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
    }

    #[test]
    fn test_read_deployment_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = read_json_file::<DeploymentConfig>(file.path()).unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn test_read_deployment_missing_file() {
        assert!(read_json_file::<DeploymentConfig>(Path::new("/nonexistent/xdm.json")).is_err());
    }

    #[test]
    fn test_execute_hello_world() {
        let config: DeploymentConfig = serde_json::from_str(DEPLOYMENT).unwrap();
        let command = command(PathBuf::new());

        let report = command.execute(&config).unwrap();
        assert_eq!(report.nonce, 1);
        assert_eq!(report.message_id, compute_message_id(2, config.executor, 1));
        assert_eq!(report.outcome.message_id, report.message_id);
        assert!(report.outcome.all_succeeded());
        assert_eq!(report.received_message, "HelloWorld");
        assert_eq!(report.received_sender, Some(command.sender));
    }

    #[test]
    fn test_execute_is_repeatable() {
        let config: DeploymentConfig = serde_json::from_str(DEPLOYMENT).unwrap();
        let command = command(PathBuf::new());

        // Every run builds a fresh deployment, so nonces restart.
        let first: SendReport = command.execute(&config).unwrap();
        assert_eq!(command.execute(&config).unwrap(), first);
    }

    #[test]
    fn test_execute_out_of_gas() {
        let config: DeploymentConfig = serde_json::from_str(DEPLOYMENT).unwrap();
        let command = SendCommand { gas_limit: Some(1), ..command(PathBuf::new()) };

        let report = command.execute(&config).unwrap();
        assert!(!report.outcome.all_succeeded());
        assert!(report.received_message.is_empty());
    }
}
