//! Run plans: everything one deployment needs, fixed at invocation time.

use crate::config::DeployConfig;
use crate::prereq::{Requirement, Rule};
use crate::target::{DeployTarget, Environment, TargetKind};
use shipway_pipeline::{BuildStage, StageConfig};
use std::path::{Path, PathBuf};

/// Artifact directories probed after a frontend build, in priority order.
pub const ARTIFACT_CANDIDATES: &[&str] = &["dist", "build", "out"];

/// Immutable description of one deployment run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub target: DeployTarget,
    pub environment: Environment,
    pub workspace: PathBuf,

    /// Build stages, in execution order.
    pub stages: Vec<StageConfig>,

    /// Artifact candidates; empty means the run produces no local artifact.
    pub artifact_candidates: Vec<String>,

    /// URL polled after a successful deploy; `None` skips verification.
    pub health_url: Option<String>,

    /// Global prerequisites, checked before anything runs. Deployer
    /// credential rules are evaluated separately by the orchestrator.
    pub prerequisites: Vec<Requirement>,
}

impl RunPlan {
    /// Build the standard plan for a workload class.
    pub fn for_kind(
        kind: TargetKind,
        target: DeployTarget,
        environment: Environment,
        workspace: &Path,
        config: &DeployConfig,
    ) -> Self {
        match kind {
            TargetKind::Frontend => Self::frontend(target, environment, workspace, config),
            TargetKind::Backend => Self::backend(target, environment, workspace, config),
        }
    }

    /// Frontend plan: install, lint, test, build; the build stage receives
    /// the API base URL variables and must leave an artifact directory.
    pub fn frontend(
        target: DeployTarget,
        environment: Environment,
        workspace: &Path,
        config: &DeployConfig,
    ) -> Self {
        let mut build = StageConfig::from_builtin(BuildStage::Build);
        for (key, value) in config.build_envs(environment) {
            build = build.env(key, value);
        }

        Self {
            target,
            environment,
            workspace: workspace.to_path_buf(),
            stages: vec![
                StageConfig::from_builtin(BuildStage::Install),
                StageConfig::from_builtin(BuildStage::Lint),
                StageConfig::from_builtin(BuildStage::Test),
                build,
            ],
            artifact_candidates: ARTIFACT_CANDIDATES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            health_url: config.frontend_url().map(str::to_string),
            prerequisites: workspace_prerequisites(),
        }
    }

    /// Backend plan: install, lint, test. The deploy hands the repository
    /// to the platform, so no local build artifact is produced.
    pub fn backend(
        target: DeployTarget,
        environment: Environment,
        workspace: &Path,
        config: &DeployConfig,
    ) -> Self {
        let mut prerequisites = workspace_prerequisites();
        // The backend talks to its database at runtime; a missing URI is
        // worth a warning but is the platform's concern, not ours.
        prerequisites.push(Requirement::advisory(Rule::EnvVarSet(
            "MONGODB_URI".to_string(),
        )));

        Self {
            target,
            environment,
            workspace: workspace.to_path_buf(),
            stages: vec![
                StageConfig::from_builtin(BuildStage::Install),
                StageConfig::from_builtin(BuildStage::Lint),
                StageConfig::from_builtin(BuildStage::Test),
            ],
            artifact_candidates: Vec::new(),
            health_url: config.backend_url().map(str::to_string),
            prerequisites,
        }
    }

    /// Drop the health URL, forcing verification to be skipped.
    pub fn skip_health(mut self) -> Self {
        self.health_url = None;
        self
    }

    /// Names of enabled stages, in order.
    pub fn stage_names(&self) -> Vec<String> {
        self.stages
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.name.clone())
            .collect()
    }
}

fn workspace_prerequisites() -> Vec<Requirement> {
    vec![
        Requirement::new(Rule::FileExists(PathBuf::from("package.json"))),
        Requirement::new(Rule::ToolOnPath("node".to_string())),
        Requirement::new(Rule::ToolOnPath("npm".to_string())),
    ]
}
