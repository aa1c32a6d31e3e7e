//! CLI command definitions

use crate::actions::ToolchainConfig;
use crate::execution::RunnerOptions;
use clap::Args;
use std::path::PathBuf;

/// Run a pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// Network configuration (default: <pipeline dir>/../config/networks.json)
    #[arg(long)]
    pub networks: Option<PathBuf>,

    /// Hardhat project directory (default: <pipeline dir>/../contracts)
    #[arg(long)]
    pub contracts_dir: Option<PathBuf>,

    /// Path to the npx executable
    #[arg(long)]
    pub npx: Option<String>,

    /// Timeout per external command, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunCommand {
    pub fn runner_options(&self) -> RunnerOptions {
        let mut toolchain = ToolchainConfig::new();
        if let Some(npx) = &self.npx {
            toolchain = toolchain.with_npx_path(npx.clone());
        }
        if let Some(dir) = &self.contracts_dir {
            toolchain = toolchain.with_contracts_dir(dir.clone());
        }
        if let Some(timeout) = self.timeout {
            toolchain = toolchain.with_timeout(timeout);
        }

        RunnerOptions {
            networks_path: self.networks.clone(),
            toolchain,
        }
    }
}

/// Validate a pipeline configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub pipeline: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
