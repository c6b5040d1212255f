//! Build stage definitions and configuration.

use serde::{Deserialize, Serialize};

/// Builtin build stages, in the order they run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuildStage {
    /// npm ci
    Install,

    /// npm run lint
    Lint,

    /// npm test
    Test,

    /// npm run build
    Build,
}

impl BuildStage {
    /// Get the stage name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            BuildStage::Install => "install",
            BuildStage::Lint => "lint",
            BuildStage::Test => "test",
            BuildStage::Build => "build",
        }
    }

    /// Get the stage's command.
    pub fn command(&self) -> Vec<String> {
        match self {
            BuildStage::Install => vec!["npm".to_string(), "ci".to_string()],
            BuildStage::Lint => {
                vec!["npm".to_string(), "run".to_string(), "lint".to_string()]
            }
            BuildStage::Test => vec!["npm".to_string(), "test".to_string()],
            BuildStage::Build => {
                vec!["npm".to_string(), "run".to_string(), "build".to_string()]
            }
        }
    }

    /// Whether a failure of this stage aborts the pipeline by default.
    ///
    /// Install and build failures are fatal; lint and test failures are
    /// tolerated so the run proceeds to deployment. The lenient half of this
    /// policy mirrors the behavior of the deploy flow this tool replaced and
    /// is pending product confirmation.
    pub fn fatal_by_default(&self) -> bool {
        match self {
            BuildStage::Install | BuildStage::Build => true,
            BuildStage::Lint | BuildStage::Test => false,
        }
    }

    /// Default timeout for this stage.
    pub fn default_timeout_secs(&self) -> u64 {
        match self {
            BuildStage::Install | BuildStage::Build => 600,
            BuildStage::Lint | BuildStage::Test => 300,
        }
    }
}

/// Configuration for one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Human-readable stage name.
    pub name: String,

    /// Command to execute (first element is the executable).
    pub command: Vec<String>,

    /// Whether a failure aborts the remaining stages.
    pub fatal_if_failed: bool,

    /// Extra environment variables for this stage.
    pub envs: Vec<(String, String)>,

    /// Timeout in seconds (0 disables it).
    pub timeout_secs: u64,

    /// Whether this stage is enabled.
    pub enabled: bool,
}

impl StageConfig {
    /// Create a stage configuration from a builtin stage.
    pub fn from_builtin(stage: BuildStage) -> Self {
        Self {
            name: stage.name().to_string(),
            command: stage.command(),
            fatal_if_failed: stage.fatal_by_default(),
            envs: Vec::new(),
            timeout_secs: stage.default_timeout_secs(),
            enabled: true,
        }
    }

    /// Create a custom stage configuration. Custom stages are fatal unless
    /// downgraded with [`StageConfig::non_fatal`].
    pub fn custom(name: impl Into<String>, command: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            name: name.into(),
            command,
            fatal_if_failed: true,
            envs: Vec::new(),
            timeout_secs,
            enabled: true,
        }
    }

    /// Record a failure of this stage as a warning instead of aborting.
    pub fn non_fatal(mut self) -> Self {
        self.fatal_if_failed = false;
        self
    }

    /// Add an environment variable for this stage.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Disable this stage.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
