//! Railway deployer: wraps the `railway` CLI.

use super::{Deployer, DEPLOY_TIMEOUT_SECS};
use crate::error::Result;
use crate::prereq::{Requirement, Rule};
use crate::target::{DeployTarget, Environment};
use async_trait::async_trait;
use shipway_pipeline::{CommandRunner, CommandSpec, ExecutionResult};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct RailwayDeployer {
    workspace: PathBuf,
    environment: Environment,
}

impl RailwayDeployer {
    pub fn new(workspace: &Path, environment: Environment) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            environment,
        }
    }

    fn command(&self) -> CommandSpec {
        let mut spec = CommandSpec::new("railway")
            .args(["up", "--detach"])
            .current_dir(&self.workspace)
            .timeout_secs(DEPLOY_TIMEOUT_SECS);
        if !self.environment.is_production() {
            spec = spec.args(["--environment", self.environment.name()]);
        }
        spec
    }
}

#[async_trait]
impl Deployer for RailwayDeployer {
    fn target(&self) -> DeployTarget {
        DeployTarget::Railway
    }

    // Railway authenticates through its CLI session; the only checkable
    // requirement is the CLI itself.
    fn credential_rules(&self) -> Vec<Requirement> {
        vec![Requirement::new(Rule::ToolOnPath("railway".to_string()))]
    }

    async fn deploy(&self, _artifact: Option<&Path>) -> Result<ExecutionResult> {
        info!(environment = %self.environment, "deploying to railway");
        Ok(CommandRunner::run(&self.command()).await?)
    }
}
