//! Core domain models
//!
//! This module defines the pipeline definition, job outputs, the run state
//! threaded through a run, and the resolver that wires outputs of earlier
//! jobs into the parameters of later ones.

pub mod config;
pub mod context;
pub mod job;
pub mod network;
pub mod reference;
pub mod state;

pub use config::{LoadError, PipelineConfig};
pub use context::*;
pub use job::*;
pub use network::{NetworkConfigError, NetworkConfigs, NetworkDetails, NetworkSource};
pub use reference::{resolve, OutputReference, ResolutionWarning, ResolvedParams, UnresolvedReason};
pub use state::*;
