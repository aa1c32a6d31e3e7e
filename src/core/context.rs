//! Run state - the mutable record of a single pipeline run

use crate::core::state::{JobOutput, RunPhase};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Auxiliary cross-job data, e.g. contract name -> deployed address
pub type SideState = HashMap<String, String>;

/// State owned by exactly one `run()` invocation
///
/// Only the job executor writes `job_outputs`; actions may read and write
/// `side_state` while their job is executing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Current lifecycle phase
    pub phase: RunPhase,

    /// Outputs keyed by job name (a later job with the same name overwrites)
    pub job_outputs: HashMap<String, JobOutput>,

    /// Side-channel data accumulated by actions
    pub side_state: SideState,
}

impl RunState {
    /// Create an empty state in the `Loaded` phase
    pub fn new() -> Self {
        Self {
            phase: RunPhase::Loaded,
            job_outputs: HashMap::new(),
            side_state: SideState::new(),
        }
    }

    /// Record the output of a job
    pub fn record_output(&mut self, job_name: &str, output: JobOutput) {
        self.job_outputs.insert(job_name.to_string(), output);
    }

    /// Get the recorded output of a job
    pub fn job_output(&self, job_name: &str) -> Option<&JobOutput> {
        self.job_outputs.get(job_name)
    }

    pub fn start(&mut self) {
        self.phase = RunPhase::Running;
    }

    pub fn finish(&mut self) {
        self.phase = RunPhase::Finished;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
