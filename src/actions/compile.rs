//! `actions/compile@v1` - compile contracts with hardhat

use crate::actions::{run_checked, Action, ActionContext, ActionError};
use crate::core::{param_display, param_str, JobOutput, Params};
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileAction;

#[async_trait]
impl Action for CompileAction {
    async fn run(&self, params: &Params, ctx: &mut ActionContext<'_>) -> Result<JobOutput, ActionError> {
        match param_str(params, "tool") {
            Some("hardhat") => {}
            _ => return Err(ActionError::UnsupportedTool(param_display(params, "tool"))),
        }

        info!("Compiling contracts with Hardhat...");
        let command = ctx.toolchain.hardhat(["compile"]);
        let output = run_checked(ctx.toolchain, &command).await?;
        debug!("hardhat compile output:\n{}", output.stdout);

        info!("Compilation successful");
        Ok(JobOutput::success())
    }
}
