//! Test support for actions: a scripted command executor and a test bed

use crate::actions::{
    Action, ActionContext, ActionError, CommandError, CommandExecutor, CommandOutput, CommandSpec,
    Toolchain, ToolchainConfig,
};
use crate::core::{JobOutput, NetworkConfigs, NetworkDetails, NetworkSource, Params, SideState};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Scripted response for [`ScriptedCommands`]
pub enum Scripted {
    Output(CommandOutput),
    NotFound,
}

/// Returns one scripted response per call and records every command
pub struct ScriptedCommands {
    responses: Mutex<Vec<Scripted>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedCommands {
    pub fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedCommands {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(command.clone());
        let next = {
            let mut responses = self.responses.lock().unwrap();
            assert!(!responses.is_empty(), "no scripted response for `{}`", command.display());
            responses.remove(0)
        };
        match next {
            Scripted::Output(output) => Ok(output),
            Scripted::NotFound => Err(CommandError::NotFound(command.program.clone())),
        }
    }
}

/// `localhost` with every field configured
pub fn localhost_networks() -> NetworkConfigs {
    NetworkConfigs::new().with_network(
        "localhost",
        NetworkDetails {
            rpc_url: Some("http://127.0.0.1:8545".to_string()),
            etherscan_api_key: Some("mock_etherscan_key".to_string()),
            chain_id: Some(31337),
        },
    )
}

/// Everything an action needs, with the toolchain scripted
pub struct TestBed {
    pub commands: Arc<ScriptedCommands>,
    pub networks: NetworkSource,
    pub toolchain: Toolchain,
    pub side_state: SideState,
}

impl TestBed {
    pub fn new(responses: Vec<Scripted>) -> Self {
        let commands = Arc::new(ScriptedCommands::new(responses));
        let toolchain = ToolchainConfig::new()
            .with_contracts_dir("/contracts")
            .build_with_executor(Path::new("/pipelines/pipeline.yaml"), commands.clone());

        Self {
            commands,
            networks: NetworkSource::loaded(localhost_networks()),
            toolchain,
            side_state: SideState::new(),
        }
    }

    pub fn with_networks(mut self, networks: NetworkSource) -> Self {
        self.networks = networks;
        self
    }

    pub async fn run<A: Action>(&mut self, action: &A, params: &Params) -> Result<JobOutput, ActionError> {
        let mut ctx = ActionContext {
            pipeline_path: Path::new("/pipelines/pipeline.yaml"),
            networks: &self.networks,
            toolchain: &self.toolchain,
            side_state: &mut self.side_state,
        };
        action.run(params, &mut ctx).await
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.commands.calls()
    }
}

/// Build params from `(key, json)` pairs
pub fn params(pairs: &[(&str, serde_json::Value)]) -> Params {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}
