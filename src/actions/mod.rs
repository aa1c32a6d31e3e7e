//! Built-in actions and the contract every action satisfies
//!
//! An action receives its resolved parameters and an [`ActionContext`] and
//! returns a [`JobOutput`]. Failures are reported as [`ActionError`], which
//! the registry turns into `{status: failure, error: <message>}` at the
//! dispatch boundary.

pub mod command;
pub mod compile;
pub mod deploy;
pub mod env;
pub mod registry;
#[cfg(test)]
pub(crate) mod testing;
pub mod toolchain;
pub mod verify;

use crate::core::{JobOutput, NetworkConfigError, NetworkSource, Params, SideState};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use command::{CommandError, CommandExecutor, CommandOutput, CommandSpec, SubprocessExecutor};
pub use compile::CompileAction;
pub use deploy::DeployAction;
pub use registry::ActionRegistry;
pub use toolchain::{Toolchain, ToolchainConfig};
pub use verify::VerifyAction;

/// The closed set of action kinds known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Compile,
    Deploy,
    Verify,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Compile, ActionKind::Deploy, ActionKind::Verify];

    /// The identifier used in `uses:`
    pub fn id(&self) -> &'static str {
        match self {
            ActionKind::Compile => "actions/compile@v1",
            ActionKind::Deploy => "actions/deploy@v1",
            ActionKind::Verify => "actions/verify@v1",
        }
    }

    /// Exact-match lookup of an action identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Per-job failure reported by an action
///
/// The display text becomes the `error` field of the job output.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("npx/hardhat not found")]
    ToolNotFound,

    #[error("Unsupported tool: {0}")]
    UnsupportedTool(String),

    #[error("Missing parameter: {0}")]
    MissingParam(&'static str),

    #[error(transparent)]
    NetworkConfig(#[from] NetworkConfigError),

    #[error("Network {0} not found")]
    NetworkNotFound(String),

    #[error("RPC URL not configured")]
    RpcUrlMissing,

    #[error("Etherscan API key missing")]
    EtherscanKeyMissing,

    #[error("No address to verify")]
    NoAddress,

    #[error("Could not extract address")]
    AddressNotFound,

    /// The tool ran and exited non-zero; carries its stderr
    #[error("{stderr}")]
    CommandFailed { exit_code: Option<i32>, stderr: String },

    #[error("Command timed out after {0} seconds")]
    Timeout(u64),

    #[error("{0}")]
    Command(String),
}

impl ActionError {
    /// Exit code of the failed tool, when the fault came from one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ActionError::CommandFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

impl From<CommandError> for ActionError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NotFound(_) => ActionError::ToolNotFound,
            CommandError::Timeout(secs) => ActionError::Timeout(secs),
            other => ActionError::Command(other.to_string()),
        }
    }
}

/// What an action may see and touch while its job runs
pub struct ActionContext<'a> {
    /// Location of the pipeline file, for resolving sibling files
    pub pipeline_path: &'a Path,

    /// Network configuration, possibly unavailable
    pub networks: &'a NetworkSource,

    /// External toolchain access
    pub toolchain: &'a Toolchain,

    /// Cross-job side-channel state (e.g. deployed addresses)
    pub side_state: &'a mut SideState,
}

/// Trait for action execution - one implementation per action kind
#[async_trait]
pub trait Action: Send + Sync {
    /// Run the action with already-resolved parameters
    async fn run(&self, params: &Params, ctx: &mut ActionContext<'_>) -> Result<JobOutput, ActionError>;
}

/// Run a toolchain command, mapping a non-zero exit to [`ActionError::CommandFailed`]
pub(crate) async fn run_checked(
    toolchain: &Toolchain,
    command: &CommandSpec,
) -> Result<CommandOutput, ActionError> {
    let output = toolchain.commands().run(command).await?;
    if !output.is_success() {
        return Err(ActionError::CommandFailed {
            exit_code: output.exit_code,
            stderr: output.stderr,
        });
    }
    Ok(output)
}
