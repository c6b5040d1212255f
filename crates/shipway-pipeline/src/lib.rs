//! Shipway build pipeline.
//!
//! Runs the pre-deploy build steps as an ordered sequence of external
//! commands:
//! - Executes each stage as a child process with captured output
//! - Aborts on fatal stage failure, warns and continues on tolerated failure
//! - Locates the produced build artifact from an ordered candidate list

pub mod error;
pub mod pipeline;
pub mod runner;
pub mod stage;

// Re-export key types
pub use error::{PipelineError, Result};
pub use pipeline::{BuildOutcome, BuildPipeline, StageRecord};
pub use runner::{CommandRunner, CommandSpec, ExecutionResult};
pub use stage::{BuildStage, StageConfig};
