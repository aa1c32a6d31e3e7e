//! `actions/deploy@v1` - deploy a contract with `hardhat run scripts/deploy.js`

use crate::actions::env::clean_process_env;
use crate::actions::{run_checked, Action, ActionContext, ActionError};
use crate::core::{param_str, JobOutput, Params};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

/// Environment variable the deploy script reads its constructor argument from
pub const INITIAL_GREETING_VAR: &str = "INITIAL_GREETING";

#[derive(Debug, Clone, Copy, Default)]
pub struct DeployAction;

#[async_trait]
impl Action for DeployAction {
    async fn run(&self, params: &Params, ctx: &mut ActionContext<'_>) -> Result<JobOutput, ActionError> {
        let network = param_str(params, "network").ok_or(ActionError::MissingParam("network"))?;
        let contract = param_str(params, "contract").ok_or(ActionError::MissingParam("contract"))?;

        info!("Deploying {} to {}...", contract, network);
        debug!("Pipeline: {}", ctx.pipeline_path.display());

        let details = ctx
            .networks
            .require()?
            .get(network)
            .ok_or_else(|| ActionError::NetworkNotFound(network.to_string()))?;

        if details.rpc_url.as_deref().map_or(true, str::is_empty) {
            return Err(ActionError::RpcUrlMissing);
        }

        let mut env = clean_process_env();
        if let Some(first) = params.get("args").and_then(Value::as_array).and_then(|args| args.first()) {
            env.insert(INITIAL_GREETING_VAR.to_string(), constructor_arg(first));
        }

        let command = ctx
            .toolchain
            .hardhat(["run", "scripts/deploy.js", "--network", network])
            .env(env);
        let output = run_checked(ctx.toolchain, &command).await?;
        debug!("hardhat run output:\n{}", output.stdout);

        let address = extract_address(&output.stdout, contract).ok_or(ActionError::AddressNotFound)?;
        info!("Deployment successful. Address: {}", address);

        ctx.side_state.insert(contract.to_string(), address.clone());
        Ok(JobOutput::success().with_field("address", address))
    }
}

fn constructor_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Find `<contract> deployed to 0x...` in the deploy script's output
///
/// The deploy script must echo the same contract name the job passes as `contract`.
pub fn extract_address(stdout: &str, contract: &str) -> Option<String> {
    let pattern = format!(r"{} deployed to (0x[a-fA-F0-9]{{40}})", regex::escape(contract));
    let regex = Regex::new(&pattern).ok()?;
    regex
        .captures(stdout)
        .and_then(|captures| captures.get(1))
        .map(|address| address.as_str().to_string())
}
