//! Pipeline execution engine

pub mod engine;
pub mod executor;

pub use engine::{EventHandler, PipelineRunner, RunEvent, RunReport, RunSummary, RunnerOptions};
pub use executor::{JobExecutor, JobRecord, RunEnvironment};
