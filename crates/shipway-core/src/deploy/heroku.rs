//! Heroku deployer: git-push based release flow.

use super::{Deployer, DEPLOY_TIMEOUT_SECS};
use crate::error::Result;
use crate::prereq::{Requirement, Rule};
use crate::target::DeployTarget;
use async_trait::async_trait;
use shipway_pipeline::{CommandRunner, CommandSpec, ExecutionResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// Remote name the Heroku CLI configures on `heroku git:remote`.
const HEROKU_REMOTE: &str = "heroku";
const PUSH_BRANCH: &str = "main";

pub struct HerokuDeployer {
    workspace: PathBuf,
}

impl HerokuDeployer {
    pub fn new(workspace: &Path) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
        }
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new("git")
            .args(["push", HEROKU_REMOTE, PUSH_BRANCH])
            .current_dir(&self.workspace)
            .timeout_secs(DEPLOY_TIMEOUT_SECS)
    }
}

#[async_trait]
impl Deployer for HerokuDeployer {
    fn target(&self) -> DeployTarget {
        DeployTarget::Heroku
    }

    fn credential_rules(&self) -> Vec<Requirement> {
        vec![
            Requirement::new(Rule::ToolOnPath("git".to_string())),
            // The release itself only needs the git remote; the CLI is for
            // remote management and log tailing.
            Requirement::advisory(Rule::ToolOnPath("heroku".to_string())),
        ]
    }

    async fn deploy(&self, _artifact: Option<&Path>) -> Result<ExecutionResult> {
        info!(remote = HEROKU_REMOTE, branch = PUSH_BRANCH, "pushing to heroku");
        Ok(CommandRunner::run(&self.command()).await?)
    }
}
