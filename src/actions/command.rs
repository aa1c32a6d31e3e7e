//! External command execution
//!
//! Actions never spawn processes directly; they go through a
//! [`CommandExecutor`] so tests can script the toolchain.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// A command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,

    /// Full environment for the child; `None` inherits the parent's
    pub env: Option<BTreeMap<String, String>>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// The command line, for logging
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Failure to run a command at all
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}: command not found")]
    NotFound(String),

    #[error("Command timed out after {0} seconds")]
    Timeout(u64),

    #[error("Failed to execute {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Capability to run external commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run a command to completion, capturing its output
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

/// Runs commands as child processes
#[derive(Debug, Clone, Default)]
pub struct SubprocessExecutor {
    /// Optional limit per command, in seconds
    timeout_secs: Option<u64>,
}

impl SubprocessExecutor {
    pub fn new(timeout_secs: Option<u64>) -> Self {
        Self { timeout_secs }
    }
}

#[async_trait]
impl CommandExecutor for SubprocessExecutor {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        debug!("Running `{}` in {}", spec.display(), spec.cwd.display());

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).current_dir(&spec.cwd).kill_on_drop(true);
        if let Some(env) = &spec.env {
            command.env_clear().envs(env);
        }

        let output = match self.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), command.output())
                .await
                .map_err(|_| CommandError::Timeout(secs))?,
            None => command.output().await,
        };

        let output = output.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CommandError::NotFound(spec.program.clone())
            } else {
                CommandError::Io {
                    program: spec.program.clone(),
                    source,
                }
            }
        })?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.is_success() {
            warn!(
                "`{}` exited with code {}: {}",
                spec.display(),
                result.exit_code.unwrap_or(-1),
                result.stderr.trim()
            );
        }

        Ok(result)
    }
}
