//! Toolchain configuration - where and how actions invoke `npx hardhat`

use crate::actions::command::{CommandExecutor, CommandSpec, SubprocessExecutor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration for the external toolchain
#[derive(Debug, Clone, Default)]
pub struct ToolchainConfig {
    /// Path to the `npx` executable
    ///
    /// If not provided, defaults to "npx" (assumes it's on PATH).
    pub npx_path: Option<String>,

    /// Directory containing the hardhat project
    ///
    /// If not provided, defaults to `<pipeline dir>/../contracts`.
    pub contracts_dir: Option<PathBuf>,

    /// Timeout per command in seconds (none by default)
    pub timeout_secs: Option<u64>,
}

impl ToolchainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_npx_path(mut self, npx_path: impl Into<String>) -> Self {
        self.npx_path = Some(npx_path.into());
        self
    }

    pub fn with_contracts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.contracts_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Build a toolchain that runs real subprocesses
    pub fn build(&self, pipeline_path: &Path) -> Toolchain {
        self.build_with_executor(
            pipeline_path,
            Arc::new(SubprocessExecutor::new(self.timeout_secs)),
        )
    }

    /// Build a toolchain around a custom command executor
    pub fn build_with_executor(
        &self,
        pipeline_path: &Path,
        commands: Arc<dyn CommandExecutor>,
    ) -> Toolchain {
        let contracts_dir = self.contracts_dir.clone().unwrap_or_else(|| {
            pipeline_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("..")
                .join("contracts")
        });

        Toolchain {
            npx: self.npx_path.clone().unwrap_or_else(|| "npx".to_string()),
            contracts_dir,
            commands,
        }
    }
}

/// Resolved toolchain handed to actions
#[derive(Clone)]
pub struct Toolchain {
    npx: String,
    contracts_dir: PathBuf,
    commands: Arc<dyn CommandExecutor>,
}

impl Toolchain {
    pub fn contracts_dir(&self) -> &Path {
        &self.contracts_dir
    }

    pub fn commands(&self) -> &dyn CommandExecutor {
        self.commands.as_ref()
    }

    /// `npx hardhat <args...>` in the contracts directory
    pub fn hardhat<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(self.npx.clone(), self.contracts_dir.clone())
            .args(["hardhat".to_string()])
            .args(args)
    }
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain")
            .field("npx", &self.npx)
            .field("contracts_dir", &self.contracts_dir)
            .finish_non_exhaustive()
    }
}
