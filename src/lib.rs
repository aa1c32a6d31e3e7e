//! web3-devops - A pipeline runner for compiling, deploying and verifying smart contracts

pub mod actions;
pub mod cli;
pub mod core;
pub mod execution;

// Re-export commonly used types
pub use actions::{Action, ActionContext, ActionError, ActionKind, ActionRegistry, ToolchainConfig};
pub use core::{JobOutput, JobSpec, JobStatus, LoadError, PipelineConfig, PipelineDefinition, RunState};
pub use execution::{PipelineRunner, RunEvent, RunReport, RunnerOptions};
