//! Job domain model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters passed to an action, keyed by parameter name
pub type Params = Map<String, Value>;

/// A single job in a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Job name, used as the key for its recorded output
    pub name: String,

    /// Action identifier, e.g. `actions/compile@v1`
    pub action_id: String,

    /// Raw parameters, possibly containing reference expressions
    pub params: Params,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action_id: action_id.into(),
            params: Params::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A parsed pipeline, immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub name: String,
    pub jobs: Vec<JobSpec>,
}

/// Read a string parameter, treating the missing sentinel as absent
pub fn param_str<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

/// Render a parameter for diagnostics the way it was written
pub fn param_display(params: &Params, key: &str) -> String {
    match params.get(key) {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
