//! Render deployer: triggers the service's deploy hook over HTTP.

use super::Deployer;
use crate::config::DeployConfig;
use crate::error::{DeployError, Result};
use crate::prereq::{Requirement, Rule};
use crate::target::DeployTarget;
use async_trait::async_trait;
use shipway_pipeline::ExecutionResult;
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub struct RenderDeployer {
    hook_url: Option<String>,
    client: reqwest::Client,
}

impl RenderDeployer {
    pub fn new(config: &DeployConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shipway/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            hook_url: config.render_deploy_hook_url().map(str::to_string),
            client,
        }
    }
}

#[async_trait]
impl Deployer for RenderDeployer {
    fn target(&self) -> DeployTarget {
        DeployTarget::Render
    }

    fn credential_rules(&self) -> Vec<Requirement> {
        vec![Requirement::new(Rule::EnvVarSet(
            "RENDER_DEPLOY_HOOK_URL".to_string(),
        ))]
    }

    /// POST to the deploy hook. Render builds from the connected repository,
    /// so no artifact or subprocess is involved; the HTTP exchange is
    /// reported in the uniform exit-code shape.
    async fn deploy(&self, _artifact: Option<&Path>) -> Result<ExecutionResult> {
        let url = self
            .hook_url
            .as_deref()
            .ok_or_else(|| DeployError::CredentialMissing {
                target: DeployTarget::Render.name().to_string(),
                detail: "RENDER_DEPLOY_HOOK_URL is not set".to_string(),
            })?;

        info!("triggering render deploy hook");
        let start = Instant::now();
        let response = self.client.post(url).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Ok(ExecutionResult {
            exit_code: if status.is_success() { 0 } else { 1 },
            stdout: format!("deploy hook answered {status}"),
            stderr: if status.is_success() { String::new() } else { body },
            duration_ms: start.elapsed().as_millis() as u64,
            timed_out: false,
        })
    }
}
