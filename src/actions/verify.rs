//! `actions/verify@v1` - verify a deployed contract on Etherscan

use crate::actions::env::clean_process_env;
use crate::actions::{run_checked, Action, ActionContext, ActionError};
use crate::core::{param_str, JobOutput, Params};
use async_trait::async_trait;
use tracing::{debug, info};

pub const ETHERSCAN_API_KEY_VAR: &str = "ETHERSCAN_API_KEY";

#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyAction;

#[async_trait]
impl Action for VerifyAction {
    async fn run(&self, params: &Params, ctx: &mut ActionContext<'_>) -> Result<JobOutput, ActionError> {
        let network = param_str(params, "network");
        let contract = param_str(params, "contract");

        info!(
            "Verifying {} on {}...",
            contract.unwrap_or("<unnamed>"),
            network.unwrap_or("<unset>")
        );

        // An unresolved `address` reference arrives as null; fall back to
        // whatever an earlier deploy recorded for this contract.
        let address = match param_str(params, "address").filter(|a| !a.is_empty()) {
            Some(address) => address.to_string(),
            None => contract
                .and_then(|contract| ctx.side_state.get(contract))
                .cloned()
                .ok_or(ActionError::NoAddress)?,
        };

        let networks = ctx.networks.require()?;
        let network = network.ok_or(ActionError::MissingParam("network"))?;
        let details = networks
            .get(network)
            .filter(|details| !details.is_empty())
            .ok_or_else(|| ActionError::NetworkNotFound(network.to_string()))?;

        let api_key = details
            .etherscan_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(ActionError::EtherscanKeyMissing)?;

        let mut env = clean_process_env();
        env.insert(ETHERSCAN_API_KEY_VAR.to_string(), api_key);

        let command = ctx
            .toolchain
            .hardhat(["verify", "--network", network, address.as_str()])
            .env(env);
        let output = run_checked(ctx.toolchain, &command).await?;
        debug!("hardhat verify output:\n{}", output.stdout);

        info!("Verification successful");
        Ok(JobOutput::success())
    }
}
