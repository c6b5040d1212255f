//! Domain-level error taxonomy for Shipway.
//!
//! Fatal kinds abort the orchestrator and map to a non-zero exit. Tolerated
//! conditions (lint/test failures, health-check exhaustion) never appear
//! here; they accumulate as report warnings instead.

use crate::orchestrator::RunState;
use shipway_pipeline::{ExecutionResult, PipelineError};

/// Shipway domain errors.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("mandatory prerequisites unsatisfied: {}", .0.join(", "))]
    PrerequisiteMissing(Vec<String>),

    #[error("{target} credentials missing: {detail}")]
    CredentialMissing { target: String, detail: String },

    #[error("unknown deploy target: {0}")]
    UnknownTarget(String),

    #[error("unknown environment: {0} (expected production or staging)")]
    UnknownEnvironment(String),

    #[error("build failed: {0}")]
    BuildFatal(#[from] PipelineError),

    #[error("deploy command failed with exit code {}", .result.exit_code)]
    DeployFailed { result: ExecutionResult },

    #[error("http error: {0}")]
    Http(String),

    #[error("invalid run transition: {from:?} -> {to:?}")]
    InvalidTransition { from: RunState, to: RunState },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DeployError {
    fn from(err: reqwest::Error) -> Self {
        DeployError::Http(err.to_string())
    }
}

/// Result type for Shipway domain operations.
pub type Result<T> = std::result::Result<T, DeployError>;
