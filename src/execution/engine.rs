//! Pipeline runner - orchestrates an entire pipeline run

use crate::{
    actions::{ActionRegistry, ToolchainConfig},
    core::{
        JobOutcome, JobOutput, LoadError, NetworkSource, PipelineConfig, PipelineDefinition,
        ResolutionWarning, RunState,
    },
    execution::{JobExecutor, JobRecord, RunEnvironment},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events that can occur during a pipeline run
#[derive(Debug, Clone)]
pub enum RunEvent {
    PipelineStarted {
        run_id: Uuid,
        pipeline_name: String,
        total_jobs: usize,
    },
    JobStarted {
        index: usize,
        job_name: String,
        action_id: String,
    },
    ParameterUnresolved {
        job_name: String,
        warning: ResolutionWarning,
    },
    UnknownAction {
        job_name: String,
        action_id: String,
    },
    JobFinished {
        job_name: String,
        output: Option<JobOutput>,
    },
    PipelineFinished {
        run_id: Uuid,
        success: bool,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&RunEvent) + Send + Sync>;

/// Options for loading a runner from a pipeline file
#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    /// Override for `<pipeline dir>/../config/networks.json`
    pub networks_path: Option<PathBuf>,

    pub toolchain: ToolchainConfig,
}

/// Job counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub no_output: usize,
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub pipeline_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// One record per executed job, in execution order
    pub jobs: Vec<JobRecord>,

    /// Final run state (phase is always `Finished`)
    pub state: RunState,
}

impl RunReport {
    /// True only if every job recorded a `success` output
    ///
    /// A job with no output (unknown action) counts against success.
    pub fn is_success(&self) -> bool {
        self.jobs.iter().all(|job| job.outcome() == JobOutcome::Succeeded)
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.jobs.len(),
            ..RunSummary::default()
        };
        for job in &self.jobs {
            match job.outcome() {
                JobOutcome::Succeeded => summary.succeeded += 1,
                JobOutcome::Failed => summary.failed += 1,
                JobOutcome::NoOutput => summary.no_output += 1,
            }
        }
        summary
    }

    /// The recorded output of a job, by name
    pub fn job_output(&self, job_name: &str) -> Option<&JobOutput> {
        self.state.job_output(job_name)
    }

    /// The last record for a job name
    pub fn job(&self, job_name: &str) -> Option<&JobRecord> {
        self.jobs.iter().rev().find(|job| job.job_name == job_name)
    }
}

/// Main pipeline runner
pub struct PipelineRunner {
    definition: PipelineDefinition,
    executor: JobExecutor,
    event_handlers: Vec<EventHandler>,
}

impl PipelineRunner {
    pub fn new(definition: PipelineDefinition, registry: ActionRegistry, environment: RunEnvironment) -> Self {
        Self {
            definition,
            executor: JobExecutor::new(registry, environment),
            event_handlers: Vec::new(),
        }
    }

    /// Load a pipeline file with the built-in actions
    ///
    /// A missing or malformed pipeline is a load-time fault. A missing
    /// network configuration is not: it only fails the jobs that need it.
    pub fn from_file(path: impl AsRef<Path>, options: &RunnerOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let config = PipelineConfig::from_file(path)?;

        let networks_path = options
            .networks_path
            .clone()
            .unwrap_or_else(|| NetworkSource::default_path(path));
        let environment = RunEnvironment {
            pipeline_path: path.to_path_buf(),
            networks: NetworkSource::load(&networks_path),
            toolchain: options.toolchain.build(path),
        };

        Ok(Self::new(config.to_definition(), ActionRegistry::builtin(), environment))
    }

    pub fn definition(&self) -> &PipelineDefinition {
        &self.definition
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&RunEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: RunEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute every job in declaration order
    ///
    /// Each call owns a fresh `RunState`. A failing job never stops the
    /// run; later jobs see it only through unresolved references.
    pub async fn run(&self) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut state = RunState::new();

        info!("Running pipeline: {} ({})", self.definition.name, run_id);
        self.emit_event(RunEvent::PipelineStarted {
            run_id,
            pipeline_name: self.definition.name.clone(),
            total_jobs: self.definition.jobs.len(),
        });

        state.start();
        let mut jobs = Vec::with_capacity(self.definition.jobs.len());

        for (index, job) in self.definition.jobs.iter().enumerate() {
            self.emit_event(RunEvent::JobStarted {
                index,
                job_name: job.name.clone(),
                action_id: job.action_id.clone(),
            });

            let record = self.executor.execute(job, &mut state).await;

            for warning in &record.warnings {
                self.emit_event(RunEvent::ParameterUnresolved {
                    job_name: job.name.clone(),
                    warning: warning.clone(),
                });
            }
            if record.output.is_none() {
                self.emit_event(RunEvent::UnknownAction {
                    job_name: job.name.clone(),
                    action_id: job.action_id.clone(),
                });
            }
            self.emit_event(RunEvent::JobFinished {
                job_name: job.name.clone(),
                output: record.output.clone(),
            });

            jobs.push(record);
        }

        state.finish();

        let report = RunReport {
            run_id,
            pipeline_name: self.definition.name.clone(),
            started_at,
            finished_at: Utc::now(),
            jobs,
            state,
        };

        let success = report.is_success();
        if success {
            info!("Pipeline finished: {}", self.definition.name);
        } else {
            let summary = report.summary();
            warn!(
                "Pipeline finished with problems: {} ({} failed, {} without output)",
                self.definition.name, summary.failed, summary.no_output
            );
        }
        self.emit_event(RunEvent::PipelineFinished { run_id, success });

        report
    }
}
