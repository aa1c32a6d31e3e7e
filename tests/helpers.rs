//! Test utility functions for web3-devops
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use web3_devops::actions::{
    Action, ActionContext, ActionError, ActionKind, ActionRegistry, CommandError, CommandExecutor,
    CommandOutput, CommandSpec, ToolchainConfig,
};
use web3_devops::core::{
    JobOutcome, JobOutput, NetworkConfigs, NetworkDetails, NetworkSource, Params, PipelineConfig,
};
use web3_devops::execution::{PipelineRunner, RunEnvironment, RunReport};

pub const DEPLOYED_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Fake `npx hardhat` that answers per subcommand and records every call
///
/// Subcommands without a scripted answer behave as if npx were missing.
#[derive(Default)]
pub struct FakeHardhat {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl FakeHardhat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile, deploy and verify all succeed
    pub fn working() -> Self {
        Self::new()
            .respond("compile", CommandOutput::success("Compiled 1 Solidity file successfully"))
            .respond(
                "run",
                CommandOutput::success(format!("MyContract deployed to {}", DEPLOYED_ADDRESS)),
            )
            .respond("verify", CommandOutput::success("Successfully verified contract"))
    }

    pub fn respond(mut self, subcommand: &str, output: CommandOutput) -> Self {
        self.responses.insert(subcommand.to_string(), output);
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// The hardhat subcommand of every call, in order
    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|call| call.args.get(1).cloned())
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for FakeHardhat {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(command.clone());
        command
            .args
            .get(1)
            .and_then(|subcommand| self.responses.get(subcommand))
            .cloned()
            .ok_or_else(|| CommandError::NotFound(command.program.clone()))
    }
}

/// One recorded invocation of a [`RecordingAction`]
#[derive(Debug, Clone)]
pub struct Invocation {
    pub kind: ActionKind,
    pub params: Params,
}

pub type CallLog = Arc<Mutex<Vec<Invocation>>>;

/// Stub action that logs its params and returns a fixed output
pub struct RecordingAction {
    kind: ActionKind,
    log: CallLog,
    output: JobOutput,
}

impl RecordingAction {
    pub fn new(kind: ActionKind, log: &CallLog, output: JobOutput) -> Self {
        Self {
            kind,
            log: log.clone(),
            output,
        }
    }
}

#[async_trait]
impl Action for RecordingAction {
    async fn run(&self, params: &Params, _ctx: &mut ActionContext<'_>) -> Result<JobOutput, ActionError> {
        self.log.lock().unwrap().push(Invocation {
            kind: self.kind,
            params: params.clone(),
        });
        Ok(self.output.clone())
    }
}

/// Registry where each listed kind is a [`RecordingAction`] with the given output
pub fn recording_registry(log: &CallLog, outputs: &[(ActionKind, JobOutput)]) -> ActionRegistry {
    outputs.iter().fold(ActionRegistry::empty(), |registry, (kind, output)| {
        registry.with_action(*kind, RecordingAction::new(*kind, log, output.clone()))
    })
}

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// `localhost` and `sepolia`, both fully configured
pub fn test_networks() -> NetworkConfigs {
    NetworkConfigs::new()
        .with_network(
            "localhost",
            NetworkDetails {
                rpc_url: Some("http://127.0.0.1:8545".to_string()),
                etherscan_api_key: Some("localhost_key".to_string()),
                chain_id: Some(31337),
            },
        )
        .with_network(
            "sepolia",
            NetworkDetails {
                rpc_url: Some("https://sepolia.example.org".to_string()),
                etherscan_api_key: Some("sepolia_key".to_string()),
                chain_id: Some(11155111),
            },
        )
}

pub fn environment(hardhat: Arc<FakeHardhat>, networks: NetworkSource) -> RunEnvironment {
    let path = Path::new("/project/pipelines/pipeline.yaml");
    RunEnvironment {
        pipeline_path: path.to_path_buf(),
        networks,
        toolchain: ToolchainConfig::new().build_with_executor(path, hardhat),
    }
}

/// Run a YAML pipeline with the built-in actions against a fake hardhat
pub async fn run_with_hardhat(yaml: &str, hardhat: Arc<FakeHardhat>) -> RunReport {
    run_with_networks(yaml, hardhat, NetworkSource::loaded(test_networks())).await
}

pub async fn run_with_networks(yaml: &str, hardhat: Arc<FakeHardhat>, networks: NetworkSource) -> RunReport {
    let config = PipelineConfig::from_yaml(yaml).unwrap();
    let runner = PipelineRunner::new(
        config.to_definition(),
        ActionRegistry::builtin(),
        environment(hardhat, networks),
    );
    runner.run().await
}

/// Run a YAML pipeline against an arbitrary registry
pub async fn run_with_registry(yaml: &str, registry: ActionRegistry) -> RunReport {
    let config = PipelineConfig::from_yaml(yaml).unwrap();
    let runner = PipelineRunner::new(
        config.to_definition(),
        registry,
        environment(Arc::new(FakeHardhat::new()), NetworkSource::loaded(test_networks())),
    );
    runner.run().await
}

pub fn assert_job_succeeded(report: &RunReport, job_name: &str) {
    let record = report
        .job(job_name)
        .unwrap_or_else(|| panic!("job '{}' was not executed", job_name));
    assert_eq!(
        record.outcome(),
        JobOutcome::Succeeded,
        "job '{}' should have succeeded, output: {:?}",
        job_name,
        record.output
    );
}

pub fn assert_job_failed(report: &RunReport, job_name: &str, expected_error: &str) {
    let output = report
        .job_output(job_name)
        .unwrap_or_else(|| panic!("job '{}' recorded no output", job_name));
    assert!(!output.is_success(), "job '{}' should have failed", job_name);
    assert_eq!(output.error.as_deref(), Some(expected_error));
}

/// The output field a job recorded, or `None`
pub fn output_field(report: &RunReport, job_name: &str, key: &str) -> Option<Value> {
    report.job_output(job_name).and_then(|output| output.get(key))
}
