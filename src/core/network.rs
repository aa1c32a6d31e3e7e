//! Network configuration (`networks.json`)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Connection details for one network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDetails {
    #[serde(default)]
    pub rpc_url: Option<String>,

    #[serde(default)]
    pub etherscan_api_key: Option<String>,

    #[serde(default)]
    pub chain_id: Option<u64>,
}

impl NetworkDetails {
    pub fn is_empty(&self) -> bool {
        self.rpc_url.is_none() && self.etherscan_api_key.is_none() && self.chain_id.is_none()
    }
}

/// Mapping from network name to connection details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkConfigs(HashMap<String, NetworkDetails>);

impl NetworkConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a network
    pub fn with_network(mut self, name: impl Into<String>, details: NetworkDetails) -> Self {
        self.0.insert(name.into(), details);
        self
    }

    pub fn get(&self, name: &str) -> Option<&NetworkDetails> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Why the network configuration is unavailable
///
/// The display text is the per-job diagnostic reported by actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkConfigError {
    #[error("Network config not found")]
    NotFound(PathBuf),

    #[error("Invalid networks.json")]
    Invalid { path: PathBuf, reason: String },
}

/// Network configuration as seen by actions
///
/// Loading never fails the pipeline: a missing or malformed file only
/// fails the jobs that need it.
#[derive(Debug, Clone)]
pub struct NetworkSource {
    loaded: Result<NetworkConfigs, NetworkConfigError>,
}

impl NetworkSource {
    /// Use an already loaded configuration
    pub fn loaded(configs: NetworkConfigs) -> Self {
        Self { loaded: Ok(configs) }
    }

    /// No configuration file was found at `path`
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            loaded: Err(NetworkConfigError::NotFound(path.into())),
        }
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!("Network configuration file not found: {}", path.display());
            return Self::missing(path);
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| NetworkConfigs::from_json(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(configs) => Self::loaded(configs),
            Err(reason) => {
                warn!("Error parsing {}: {}", path.display(), reason);
                Self {
                    loaded: Err(NetworkConfigError::Invalid {
                        path: path.to_path_buf(),
                        reason,
                    }),
                }
            }
        }
    }

    /// The default location: `<pipeline dir>/../config/networks.json`
    pub fn default_path(pipeline_path: &Path) -> PathBuf {
        pipeline_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("..")
            .join("config")
            .join("networks.json")
    }

    /// The loaded configuration, or the reason it is unavailable
    pub fn require(&self) -> Result<&NetworkConfigs, NetworkConfigError> {
        self.loaded.as_ref().map_err(Clone::clone)
    }
}
