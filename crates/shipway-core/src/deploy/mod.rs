//! Platform deployers and target dispatch.
//!
//! Each deployer wraps exactly one external action: a vendor CLI subprocess,
//! a git push, or a webhook POST. Retry behavior lives in the health poller,
//! never here, and a failed deploy leaves the platform in whatever state the
//! vendor tool left it; no compensating action is attempted.

mod github_pages;
mod heroku;
mod netlify;
mod railway;
mod render;
mod vercel;

pub use github_pages::GitHubPagesDeployer;
pub use heroku::HerokuDeployer;
pub use netlify::NetlifyDeployer;
pub use railway::RailwayDeployer;
pub use render::RenderDeployer;
pub use vercel::VercelDeployer;

use crate::config::DeployConfig;
use crate::error::{DeployError, Result};
use crate::prereq::{PrerequisiteChecker, PrerequisiteReport, Requirement};
use crate::target::{DeployTarget, Environment};
use async_trait::async_trait;
use shipway_pipeline::ExecutionResult;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Hard timeout for vendor deploy commands.
pub const DEPLOY_TIMEOUT_SECS: u64 = 900;

/// One platform deployment action.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Target this deployer serves.
    fn target(&self) -> DeployTarget;

    /// Requirements this deployer needs satisfied before deploying.
    fn credential_rules(&self) -> Vec<Requirement>;

    /// Perform the single deployment action.
    ///
    /// `artifact` is the built output directory when the plan produced one.
    /// A vendor command exiting non-zero is returned as a normal
    /// `ExecutionResult`; `Err` is reserved for configuration and transport
    /// failures.
    async fn deploy(&self, artifact: Option<&Path>) -> Result<ExecutionResult>;

    /// Evaluate this deployer's requirements against the run context.
    fn validate_credentials(&self, checker: &PrerequisiteChecker<'_>) -> PrerequisiteReport {
        checker.check(&self.credential_rules())
    }
}

/// Maps each target to its deployer.
///
/// Resolution failure is a fatal configuration error, never a silent no-op.
pub struct DeployerRegistry {
    deployers: HashMap<DeployTarget, Arc<dyn Deployer>>,
}

impl DeployerRegistry {
    /// Registry with no deployers; every resolve fails.
    pub fn empty() -> Self {
        Self {
            deployers: HashMap::new(),
        }
    }

    /// Registry with every supported platform registered.
    pub fn standard(config: &DeployConfig, workspace: &Path, environment: Environment) -> Self {
        let mut registry = Self::empty();
        for target in DeployTarget::ALL {
            let deployer: Arc<dyn Deployer> = match target {
                DeployTarget::Vercel => {
                    Arc::new(VercelDeployer::new(config, workspace, environment))
                }
                DeployTarget::Netlify => {
                    Arc::new(NetlifyDeployer::new(config, workspace, environment))
                }
                DeployTarget::GitHubPages => Arc::new(GitHubPagesDeployer::new(config, workspace)),
                DeployTarget::Render => Arc::new(RenderDeployer::new(config)),
                DeployTarget::Railway => Arc::new(RailwayDeployer::new(workspace, environment)),
                DeployTarget::Heroku => Arc::new(HerokuDeployer::new(workspace)),
            };
            registry.register(deployer);
        }
        registry
    }

    /// Register (or replace) a deployer, keyed by its target.
    pub fn register(&mut self, deployer: Arc<dyn Deployer>) {
        self.deployers.insert(deployer.target(), deployer);
    }

    /// Resolve the deployer for a target.
    pub fn resolve(&self, target: DeployTarget) -> Result<Arc<dyn Deployer>> {
        self.deployers
            .get(&target)
            .cloned()
            .ok_or_else(|| DeployError::UnknownTarget(target.name().to_string()))
    }

    /// Number of registered deployers.
    pub fn len(&self) -> usize {
        self.deployers.len()
    }

    /// Whether the registry has no deployers.
    pub fn is_empty(&self) -> bool {
        self.deployers.is_empty()
    }
}
