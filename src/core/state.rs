//! Job outputs and run phase models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Status every action reports for a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Failure,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Failure => "failure",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output produced by exactly one action invocation
///
/// `status` and `error` are the fields every action must provide; anything
/// action-specific (such as a deployed `address`) lives in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutput {
    pub status: JobStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl JobOutput {
    /// A successful output with no extra fields
    pub fn success() -> Self {
        Self {
            status: JobStatus::Success,
            error: None,
            fields: Map::new(),
        }
    }

    /// A failed output carrying a short diagnostic
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failure,
            error: Some(error.into()),
            fields: Map::new(),
        }
    }

    /// Add an action-specific field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }

    /// Look up a named output field, including `status` and `error`
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "status" => Some(Value::String(self.status.as_str().to_string())),
            "error" => self.error.clone().map(Value::String),
            _ => self.fields.get(key).cloned(),
        }
    }
}

/// Lifecycle of a single pipeline run
///
/// `Finished` is terminal no matter how many jobs failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Loaded,
    Running,
    Finished,
}

/// How a single job ended, as seen by the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    Succeeded,
    Failed,
    /// The action id was not recognized, so nothing was recorded
    NoOutput,
}

impl JobOutcome {
    pub fn from_output(output: Option<&JobOutput>) -> Self {
        match output {
            Some(output) if output.is_success() => JobOutcome::Succeeded,
            Some(_) => JobOutcome::Failed,
            None => JobOutcome::NoOutput,
        }
    }
}
