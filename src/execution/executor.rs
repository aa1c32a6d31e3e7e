//! Job executor - resolves, dispatches and records a single job

use crate::{
    actions::{ActionContext, ActionRegistry, Toolchain},
    core::{resolve, JobOutcome, JobOutput, JobSpec, NetworkSource, Params, ResolutionWarning, RunState},
};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Per-runner collaborators every action may need
#[derive(Debug, Clone)]
pub struct RunEnvironment {
    /// Location of the pipeline file
    pub pipeline_path: PathBuf,

    /// Network configuration, loaded once per runner
    pub networks: NetworkSource,

    /// External toolchain
    pub toolchain: Toolchain,
}

/// What happened when one job executed
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub job_name: String,
    pub action_id: String,

    /// Parameters after reference resolution, as handed to the action
    pub resolved_params: Params,

    /// References that resolved to the missing sentinel
    pub warnings: Vec<ResolutionWarning>,

    /// `None` when the action id was not recognized
    pub output: Option<JobOutput>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn outcome(&self) -> JobOutcome {
        JobOutcome::from_output(self.output.as_ref())
    }
}

/// Executes a single job against the run state
pub struct JobExecutor {
    registry: ActionRegistry,
    environment: RunEnvironment,
}

impl JobExecutor {
    pub fn new(registry: ActionRegistry, environment: RunEnvironment) -> Self {
        Self {
            registry,
            environment,
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn environment(&self) -> &RunEnvironment {
        &self.environment
    }

    /// Execute a job and record its output in `state`
    ///
    /// Nothing escapes this call: action faults are already failed outputs,
    /// a panicking action is recorded as a failure, and an unknown action
    /// simply records nothing.
    pub async fn execute(&self, job: &JobSpec, state: &mut RunState) -> JobRecord {
        info!("Executing job: {} ({})", job.name, job.action_id);
        let started_at = Utc::now();

        let resolved = resolve(&job.params, &state.job_outputs);
        for warning in &resolved.warnings {
            warn!("Job {}: {}", job.name, warning);
        }
        debug!("Resolved params for job {}: {:?}", job.name, resolved.params);

        let mut ctx = ActionContext {
            pipeline_path: &self.environment.pipeline_path,
            networks: &self.environment.networks,
            toolchain: &self.environment.toolchain,
            side_state: &mut state.side_state,
        };
        let dispatched = AssertUnwindSafe(self.registry.dispatch(&job.action_id, &resolved.params, &mut ctx))
            .catch_unwind()
            .await;
        let output = match dispatched {
            Ok(output) => output,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Action {} panicked in job {}: {}", job.action_id, job.name, message);
                Some(JobOutput::failure(format!("Action panicked: {}", message)))
            }
        };

        match &output {
            Some(output) => {
                if output.is_success() {
                    info!("Job {} succeeded", job.name);
                } else {
                    warn!(
                        "Job {} failed: {}",
                        job.name,
                        output.error.as_deref().unwrap_or("no error reported")
                    );
                }
                state.record_output(&job.name, output.clone());
            }
            None => warn!("Job {} produced no output", job.name),
        }

        JobRecord {
            job_name: job.name.clone(),
            action_id: job.action_id.clone(),
            resolved_params: resolved.params,
            warnings: resolved.warnings,
            output,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
