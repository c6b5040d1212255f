//! Netlify deployer: wraps the `netlify` CLI.

use super::{Deployer, DEPLOY_TIMEOUT_SECS};
use crate::config::DeployConfig;
use crate::error::Result;
use crate::prereq::{Requirement, Rule};
use crate::target::{DeployTarget, Environment};
use async_trait::async_trait;
use shipway_pipeline::{CommandRunner, CommandSpec, ExecutionResult};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct NetlifyDeployer {
    auth_token: Option<String>,
    site_id: Option<String>,
    workspace: PathBuf,
    production: bool,
}

impl NetlifyDeployer {
    pub fn new(config: &DeployConfig, workspace: &Path, environment: Environment) -> Self {
        Self {
            auth_token: config.netlify_auth_token().map(str::to_string),
            site_id: config.netlify_site_id().map(str::to_string),
            workspace: workspace.to_path_buf(),
            production: environment.is_production(),
        }
    }

    fn command(&self, artifact: Option<&Path>) -> CommandSpec {
        let dir = artifact
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "dist".to_string());

        let mut spec = CommandSpec::new("netlify")
            .args(["deploy", "--dir", dir.as_str()])
            .current_dir(&self.workspace)
            .timeout_secs(DEPLOY_TIMEOUT_SECS);
        if self.production {
            spec = spec.args(["--prod"]);
        }
        if let Some(site) = &self.site_id {
            spec = spec.args(["--site", site.as_str()]);
        }
        if let Some(token) = &self.auth_token {
            spec = spec.env("NETLIFY_AUTH_TOKEN", token);
        }
        spec
    }
}

#[async_trait]
impl Deployer for NetlifyDeployer {
    fn target(&self) -> DeployTarget {
        DeployTarget::Netlify
    }

    fn credential_rules(&self) -> Vec<Requirement> {
        vec![
            Requirement::new(Rule::EnvVarSet("NETLIFY_AUTH_TOKEN".to_string())),
            Requirement::new(Rule::EnvVarSet("NETLIFY_SITE_ID".to_string())),
            Requirement::new(Rule::ToolOnPath("netlify".to_string())),
        ]
    }

    async fn deploy(&self, artifact: Option<&Path>) -> Result<ExecutionResult> {
        info!(production = self.production, "deploying to netlify");
        Ok(CommandRunner::run(&self.command(artifact)).await?)
    }
}
