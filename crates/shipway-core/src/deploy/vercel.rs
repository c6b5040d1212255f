//! Vercel deployer: wraps the `vercel` CLI.

use super::{Deployer, DEPLOY_TIMEOUT_SECS};
use crate::config::DeployConfig;
use crate::error::Result;
use crate::prereq::{Requirement, Rule};
use crate::target::{DeployTarget, Environment};
use async_trait::async_trait;
use shipway_pipeline::{CommandRunner, CommandSpec, ExecutionResult};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct VercelDeployer {
    token: Option<String>,
    workspace: PathBuf,
    production: bool,
}

impl VercelDeployer {
    pub fn new(config: &DeployConfig, workspace: &Path, environment: Environment) -> Self {
        Self {
            token: config.vercel_token().map(str::to_string),
            workspace: workspace.to_path_buf(),
            production: environment.is_production(),
        }
    }

    fn command(&self) -> CommandSpec {
        let mut spec = CommandSpec::new("vercel")
            .args(["deploy", "--yes"])
            .current_dir(&self.workspace)
            .timeout_secs(DEPLOY_TIMEOUT_SECS);
        if self.production {
            spec = spec.args(["--prod"]);
        }
        if let Some(token) = &self.token {
            spec = spec.env("VERCEL_TOKEN", token);
        }
        spec
    }
}

#[async_trait]
impl Deployer for VercelDeployer {
    fn target(&self) -> DeployTarget {
        DeployTarget::Vercel
    }

    fn credential_rules(&self) -> Vec<Requirement> {
        vec![
            Requirement::new(Rule::EnvVarSet("VERCEL_TOKEN".to_string())),
            Requirement::new(Rule::ToolOnPath("vercel".to_string())),
        ]
    }

    // Vercel deploys the project directory; the CLI picks up the build
    // output itself, so the local artifact path is not forwarded.
    async fn deploy(&self, _artifact: Option<&Path>) -> Result<ExecutionResult> {
        info!(production = self.production, "deploying to vercel");
        Ok(CommandRunner::run(&self.command()).await?)
    }
}
