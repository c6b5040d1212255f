//! Run lifecycle: state machine and step sequencing.
//!
//! One orchestrator run is strictly sequential: prerequisites, build,
//! deploy, verify. Every state transition goes through the permit table, so
//! an illegal jump is an error rather than a silent skip. Verification can
//! only warn; once a deploy action succeeded the run cannot fail anymore.

use crate::config::DeployConfig;
use crate::deploy::DeployerRegistry;
use crate::error::{DeployError, Result};
use crate::health::{HealthPoller, HealthStatus};
use crate::plan::RunPlan;
use crate::prereq::PrerequisiteChecker;
use crate::report::{manual_followups, DeploymentOutcome, RunReport, StageSummary};
use serde::Serialize;
use shipway_pipeline::{BuildPipeline, ExecutionResult};
use tracing::{debug, error, info};

/// Lifecycle states of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Init,
    CheckingPrereqs,
    Building,
    Deploying,
    Verifying,
    Done,
    Failed,
}

impl RunState {
    /// Whether `next` is a legal successor of `self`.
    ///
    /// `Verifying` has exactly one successor: an unhealthy or skipped check
    /// is reported, never escalated.
    pub fn permits(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Init, CheckingPrereqs)
                | (CheckingPrereqs, Building)
                | (CheckingPrereqs, Failed)
                | (Building, Deploying)
                | (Building, Failed)
                | (Deploying, Verifying)
                | (Deploying, Failed)
                | (Verifying, Done)
        )
    }

    /// Whether this state ends the run.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

/// Sequences one deployment run to a terminal state.
pub struct Orchestrator {
    config: DeployConfig,
    registry: DeployerRegistry,
    poller: HealthPoller,
}

impl Orchestrator {
    pub fn new(config: DeployConfig, registry: DeployerRegistry, poller: HealthPoller) -> Self {
        Self {
            config,
            registry,
            poller,
        }
    }

    /// Run the full lifecycle. Always returns a report in a terminal state;
    /// fatal errors are folded into the report rather than propagated.
    pub async fn run(&self, plan: &RunPlan) -> RunReport {
        let mut report = RunReport::start(plan);
        info!(
            run_id = %report.run_id,
            target = %plan.target,
            environment = %plan.environment,
            "starting deployment run"
        );

        if let Err(err) = self.execute(plan, &mut report).await {
            error!(error = %err, "deployment run failed");
            report.fail(&err);
        }
        report.finish();
        report
    }

    async fn execute(&self, plan: &RunPlan, report: &mut RunReport) -> Result<()> {
        Self::advance(report, RunState::CheckingPrereqs)?;
        let checker = PrerequisiteChecker::new(&self.config, &plan.workspace);

        let global = checker.check(&plan.prerequisites);
        report.prerequisites.extend(global.entries.iter().cloned());
        report.warnings.extend(global.advisory_warnings());
        if !global.satisfied() {
            return Err(DeployError::PrerequisiteMissing(global.unsatisfied_names()));
        }

        // Resolve the deployer before building so an unknown target or a
        // missing credential fails the run without wasted build work.
        let deployer = self.registry.resolve(plan.target)?;
        let creds = deployer.validate_credentials(&checker);
        report.prerequisites.extend(creds.entries.iter().cloned());
        report.warnings.extend(creds.advisory_warnings());
        if !creds.satisfied() {
            return Err(DeployError::CredentialMissing {
                target: plan.target.name().to_string(),
                detail: creds.unsatisfied_names().join(", "),
            });
        }

        Self::advance(report, RunState::Building)?;
        let pipeline = BuildPipeline::new(&plan.workspace);
        let build = pipeline.run(&plan.stages).await?;
        report.stages = build.stages.iter().map(StageSummary::from).collect();
        report.warnings.extend(build.warnings);

        let artifact = if plan.artifact_candidates.is_empty() {
            None
        } else {
            Some(pipeline.locate_artifact(&plan.artifact_candidates)?)
        };

        Self::advance(report, RunState::Deploying)?;
        info!(target = %plan.target, artifact = ?artifact, "deploying");
        let result = deployer.deploy(artifact.as_deref()).await?;
        if !result.passed() {
            return Err(DeployError::DeployFailed { result });
        }

        Self::advance(report, RunState::Verifying)?;
        let health = self.poller.poll(plan.health_url.as_deref()).await;
        match health {
            HealthStatus::Healthy => {}
            HealthStatus::Unhealthy => report.warnings.push(
                "health check did not observe a 2xx response within the attempt budget"
                    .to_string(),
            ),
            HealthStatus::Skipped => report
                .warnings
                .push("no health URL configured, verification skipped".to_string()),
        }

        report.outcome = Some(DeploymentOutcome {
            target: plan.target,
            success: true,
            message: deploy_message(&result),
            health,
        });
        report.followups = manual_followups();

        Self::advance(report, RunState::Done)?;
        Ok(())
    }

    fn advance(report: &mut RunReport, next: RunState) -> Result<()> {
        let from = report.state;
        if !from.permits(next) {
            return Err(DeployError::InvalidTransition { from, to: next });
        }
        debug!(?from, ?next, "run state transition");
        report.state = next;
        Ok(())
    }
}

/// Condense a deploy command's output into a one-line message.
fn deploy_message(result: &ExecutionResult) -> String {
    result
        .stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "deploy command completed".to_string())
}
