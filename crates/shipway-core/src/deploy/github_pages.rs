//! GitHub Pages deployer: publishes the artifact via `npx gh-pages`.

use super::{Deployer, DEPLOY_TIMEOUT_SECS};
use crate::config::DeployConfig;
use crate::error::Result;
use crate::prereq::{Requirement, Rule};
use crate::target::DeployTarget;
use async_trait::async_trait;
use shipway_pipeline::{CommandRunner, CommandSpec, ExecutionResult};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct GitHubPagesDeployer {
    token: Option<String>,
    workspace: PathBuf,
}

impl GitHubPagesDeployer {
    pub fn new(config: &DeployConfig, workspace: &Path) -> Self {
        Self {
            token: config.github_token().map(str::to_string),
            workspace: workspace.to_path_buf(),
        }
    }

    fn command(&self, artifact: Option<&Path>) -> CommandSpec {
        let dir = artifact
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "dist".to_string());

        let mut spec = CommandSpec::new("npx")
            .args(["gh-pages", "-d", dir.as_str()])
            .current_dir(&self.workspace)
            .timeout_secs(DEPLOY_TIMEOUT_SECS);
        if let Some(token) = &self.token {
            spec = spec.env("GITHUB_TOKEN", token);
        }
        spec
    }
}

#[async_trait]
impl Deployer for GitHubPagesDeployer {
    fn target(&self) -> DeployTarget {
        DeployTarget::GitHubPages
    }

    fn credential_rules(&self) -> Vec<Requirement> {
        vec![
            Requirement::new(Rule::EnvVarSet("GITHUB_TOKEN".to_string())),
            Requirement::new(Rule::ToolOnPath("npx".to_string())),
            Requirement::new(Rule::ToolOnPath("git".to_string())),
        ]
    }

    async fn deploy(&self, artifact: Option<&Path>) -> Result<ExecutionResult> {
        info!("publishing to github pages");
        Ok(CommandRunner::run(&self.command(artifact)).await?)
    }
}
