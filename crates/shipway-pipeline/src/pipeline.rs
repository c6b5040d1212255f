//! Ordered stage execution and artifact location.

use crate::error::{PipelineError, Result};
use crate::runner::{CommandRunner, CommandSpec, ExecutionResult};
use crate::stage::StageConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One executed stage and its result.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    /// Stage name.
    pub name: String,

    /// Captured execution result.
    pub result: ExecutionResult,

    /// Whether this stage was configured as fatal.
    pub fatal_if_failed: bool,
}

impl StageRecord {
    /// Whether this stage passed.
    pub fn passed(&self) -> bool {
        self.result.passed()
    }
}

/// Result of a complete pipeline run that was not aborted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildOutcome {
    /// Records of executed stages, in execution order.
    pub stages: Vec<StageRecord>,

    /// Warnings from tolerated stage failures.
    pub warnings: Vec<String>,
}

impl BuildOutcome {
    /// Number of stages that passed.
    pub fn passed_count(&self) -> usize {
        self.stages.iter().filter(|s| s.passed()).count()
    }

    /// Number of stages that failed (tolerated failures only; a fatal
    /// failure aborts the run before an outcome is produced).
    pub fn failed_count(&self) -> usize {
        self.stages.iter().filter(|s| !s.passed()).count()
    }
}

/// Executes build stages in order inside one workspace.
pub struct BuildPipeline {
    workspace: PathBuf,
}

impl BuildPipeline {
    /// Create a pipeline rooted at `workspace`.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    /// Workspace root the stages run in.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Execute the stages in order.
    ///
    /// A fatal stage failing aborts immediately with the failing stage's
    /// result attached; a tolerated stage failing is recorded as a warning
    /// and execution continues. Disabled stages are skipped. A stage whose
    /// executable cannot be spawned is treated as a failed stage with
    /// exit code -1, not as a runner error.
    pub async fn run(&self, stages: &[StageConfig]) -> Result<BuildOutcome> {
        let mut outcome = BuildOutcome::default();

        for config in stages {
            if !config.enabled {
                debug!(stage = %config.name, "skipping disabled stage");
                continue;
            }
            if config.command.is_empty() {
                return Err(PipelineError::EmptyCommand(config.name.clone()));
            }

            info!(stage = %config.name, "running stage");
            let mut spec = CommandSpec::new(&config.command[0])
                .args(config.command[1..].iter().cloned())
                .current_dir(&self.workspace)
                .timeout_secs(config.timeout_secs);
            for (key, value) in &config.envs {
                spec = spec.env(key, value);
            }

            let result = match CommandRunner::run(&spec).await {
                Ok(result) => result,
                Err(e) => ExecutionResult {
                    exit_code: -1,
                    stdout: String::new(),
                    stderr: e.to_string(),
                    duration_ms: 0,
                    timed_out: false,
                },
            };

            let passed = result.passed();
            let record = StageRecord {
                name: config.name.clone(),
                result,
                fatal_if_failed: config.fatal_if_failed,
            };

            if passed {
                debug!(stage = %config.name, duration_ms = record.result.duration_ms, "stage passed");
                outcome.stages.push(record);
                continue;
            }

            if config.fatal_if_failed {
                return Err(PipelineError::StageFailed {
                    stage: record.name,
                    result: record.result,
                });
            }

            let reason = if record.result.timed_out {
                format!("stage '{}' timed out, continuing", config.name)
            } else {
                format!(
                    "stage '{}' failed with exit code {}, continuing",
                    config.name, record.result.exit_code
                )
            };
            warn!(stage = %config.name, "{reason}");
            outcome.warnings.push(reason);
            outcome.stages.push(record);
        }

        Ok(outcome)
    }

    /// Locate the build artifact among ordered candidate directories.
    ///
    /// The first candidate that exists as a directory under the workspace
    /// wins; none existing is a fatal error.
    pub fn locate_artifact(&self, candidates: &[String]) -> Result<PathBuf> {
        for candidate in candidates {
            let path = self.workspace.join(candidate);
            if path.is_dir() {
                info!(artifact = %path.display(), "located build artifact");
                return Ok(path);
            }
        }
        Err(PipelineError::ArtifactMissing {
            candidates: candidates.to_vec(),
        })
    }
}
