//! Error types for the build pipeline.

use crate::runner::ExecutionResult;
use thiserror::Error;

/// Errors that abort a build pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Stage was configured without any command words
    #[error("stage '{0}' has an empty command")]
    EmptyCommand(String),

    /// A fatal stage failed; remaining stages were not run
    #[error("stage '{stage}' failed with exit code {}", .result.exit_code)]
    StageFailed {
        stage: String,
        result: ExecutionResult,
    },

    /// None of the candidate artifact directories exist
    #[error("no build artifact found, tried: {}", .candidates.join(", "))]
    ArtifactMissing { candidates: Vec<String> },
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_failed_display() {
        let err = PipelineError::StageFailed {
            stage: "build".to_string(),
            result: ExecutionResult {
                exit_code: 2,
                stdout: String::new(),
                stderr: "out of memory".to_string(),
                duration_ms: 10,
                timed_out: false,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("build"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_artifact_missing_lists_candidates() {
        let err = PipelineError::ArtifactMissing {
            candidates: vec!["dist".to_string(), "build".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("dist"));
        assert!(msg.contains("build"));
    }
}
