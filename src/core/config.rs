//! Pipeline configuration from YAML

use crate::core::job::{JobSpec, Params, PipelineDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Faults that abort a run before any job executes
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Pipeline file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read pipeline file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing YAML pipeline: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid pipeline: {0}")]
    Invalid(String),
}

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    #[serde(default = "default_pipeline_name")]
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Jobs, executed in declaration order
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// Job configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job name, referenced as `${{ jobs.<name>.output.<key> }}`
    pub name: String,

    /// Action identifier
    pub uses: String,

    /// Action parameters
    #[serde(default, rename = "with")]
    pub with: Params,
}

fn default_pipeline_name() -> String {
    "Unnamed Pipeline".to_string()
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline structure
    ///
    /// Job names must be non-empty and free of `.`, since a reference
    /// expression splits on `.` and could never address such a job.
    /// Duplicate names are allowed; the later job's output wins.
    pub fn validate(&self) -> Result<(), LoadError> {
        let mut seen_names = HashSet::new();

        for (index, job) in self.jobs.iter().enumerate() {
            if job.name.trim().is_empty() {
                return Err(LoadError::Invalid(format!("Job #{} has an empty name", index + 1)));
            }
            if job.name.contains('.') {
                return Err(LoadError::Invalid(format!(
                    "Job name '{}' must not contain '.'",
                    job.name
                )));
            }
            if job.uses.trim().is_empty() {
                return Err(LoadError::Invalid(format!(
                    "Job '{}' has an empty 'uses'",
                    job.name
                )));
            }
            if !seen_names.insert(job.name.as_str()) {
                warn!("Duplicate job name '{}': its output will overwrite the earlier job", job.name);
            }
        }

        Ok(())
    }

    /// Convert config to the immutable pipeline definition
    pub fn to_definition(&self) -> PipelineDefinition {
        PipelineDefinition {
            name: self.name.clone(),
            jobs: self
                .jobs
                .iter()
                .map(|job| JobSpec {
                    name: job.name.clone(),
                    action_id: job.uses.clone(),
                    params: job.with.clone(),
                })
                .collect(),
        }
    }
}
