//! Cross-job output references and parameter resolution
//!
//! A parameter value of the exact form `${{ jobs.<job>.output.<key> }}` is
//! replaced by the named field of an earlier job's output. Anything else is
//! passed through untouched. Resolution is a single pass: a resolved value is
//! never scanned again.

use crate::core::{job::Params, state::JobOutput};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

const OPEN: &str = "${{";
const CLOSE: &str = "}}";

/// A parsed `${{ jobs.<job>.output.<key> }}` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReference {
    pub job: String,
    pub key: String,
}

impl OutputReference {
    /// Parse a reference expression
    ///
    /// Returns `None` for anything that is not delimiter-wrapped or does not
    /// split into exactly `jobs`, `<job>`, `output`, `<key>`.
    pub fn parse(text: &str) -> Option<Self> {
        if text.len() < OPEN.len() + CLOSE.len() || !text.starts_with(OPEN) || !text.ends_with(CLOSE) {
            return None;
        }

        let inner = text[OPEN.len()..text.len() - CLOSE.len()].trim();
        let parts: Vec<&str> = inner.split('.').collect();
        match parts.as_slice() {
            ["jobs", job, "output", key] => Some(Self {
                job: job.to_string(),
                key: key.to_string(),
            }),
            _ => None,
        }
    }
}

/// Why a reference resolved to the missing sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No output was recorded for the job (not run yet, never existed, or unknown action)
    JobNotFound,
    /// The job ran but its output has no such key
    KeyNotFound,
}

/// Non-fatal problem recorded while resolving parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionWarning {
    /// Parameter whose value could not be resolved
    pub param: String,

    /// The reference expression as written
    pub expression: String,

    pub reason: UnresolvedReason,
}

impl std::fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.reason {
            UnresolvedReason::JobNotFound => "job output not found",
            UnresolvedReason::KeyNotFound => "output key not found",
        };
        write!(f, "could not resolve '{}' for '{}': {}", self.expression, self.param, reason)
    }
}

/// Result of resolving one job's parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParams {
    pub params: Params,
    pub warnings: Vec<ResolutionWarning>,
}

/// Resolve reference expressions in `params` against recorded job outputs
///
/// Unresolvable references become `Value::Null` (the missing sentinel) and
/// produce a warning. This function has no side effects.
pub fn resolve(params: &Params, job_outputs: &HashMap<String, JobOutput>) -> ResolvedParams {
    let mut resolved = ResolvedParams::default();

    for (key, value) in params {
        let reference = match value {
            Value::String(text) => OutputReference::parse(text),
            _ => None,
        };

        let Some(reference) = reference else {
            resolved.params.insert(key.clone(), value.clone());
            continue;
        };

        let lookup = match job_outputs.get(&reference.job) {
            None => Err(UnresolvedReason::JobNotFound),
            Some(output) => output.get(&reference.key).ok_or(UnresolvedReason::KeyNotFound),
        };

        match lookup {
            Ok(found) => {
                resolved.params.insert(key.clone(), found);
            }
            Err(reason) => {
                resolved.warnings.push(ResolutionWarning {
                    param: key.clone(),
                    expression: value.as_str().unwrap_or_default().to_string(),
                    reason,
                });
                resolved.params.insert(key.clone(), Value::Null);
            }
        }
    }

    resolved
}
