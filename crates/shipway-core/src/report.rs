//! Terminal run reporting.
//!
//! A run's only persisted output is this report, rendered to the console as
//! text or JSON. Nothing is written to disk.

use crate::error::DeployError;
use crate::health::HealthStatus;
use crate::orchestrator::RunState;
use crate::plan::RunPlan;
use crate::prereq::RuleOutcome;
use crate::target::{DeployTarget, Environment};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use shipway_pipeline::StageRecord;
use std::fmt::Write as _;
use uuid::Uuid;

/// Terminal record for one deployment attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentOutcome {
    pub target: DeployTarget,
    pub success: bool,
    pub message: String,

    /// Healthy only when the poller observed a 2xx within its budget;
    /// no configured URL yields Skipped, never Healthy.
    pub health: HealthStatus,
}

/// Summary of one executed build stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub name: String,
    pub exit_code: i32,
    pub duration_ms: u64,
    pub passed: bool,
}

impl From<&StageRecord> for StageSummary {
    fn from(record: &StageRecord) -> Self {
        Self {
            name: record.name.clone(),
            exit_code: record.result.exit_code,
            duration_ms: record.result.duration_ms,
            passed: record.passed(),
        }
    }
}

/// Aggregated result of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id of this run.
    pub run_id: Uuid,

    /// Deterministic digest of the plan identity.
    pub plan_digest: String,

    pub target: DeployTarget,
    pub environment: Environment,

    /// Terminal state the run reached.
    pub state: RunState,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,

    /// Prerequisite evaluations, global rules first, then credentials.
    pub prerequisites: Vec<RuleOutcome>,

    /// Executed build stages, in order.
    pub stages: Vec<StageSummary>,

    /// Accumulated non-fatal conditions.
    pub warnings: Vec<String>,

    /// The single fatal error, when the run failed.
    pub error: Option<String>,

    pub outcome: Option<DeploymentOutcome>,

    /// Checks the tool cannot perform; listed for the operator.
    pub followups: Vec<String>,
}

impl RunReport {
    /// Open a report for a run that is about to start.
    pub fn start(plan: &RunPlan) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            plan_digest: plan_digest(plan.target, plan.environment, &plan.stage_names()),
            target: plan.target,
            environment: plan.environment,
            state: RunState::Init,
            started_at: Utc::now(),
            finished_at: None,
            duration_ms: 0,
            prerequisites: Vec::new(),
            stages: Vec::new(),
            warnings: Vec::new(),
            error: None,
            outcome: None,
            followups: Vec::new(),
        }
    }

    /// Record the fatal error that ended the run.
    pub fn fail(&mut self, err: &DeployError) {
        self.state = RunState::Failed;
        self.error = Some(err.to_string());
        self.outcome = Some(DeploymentOutcome {
            target: self.target,
            success: false,
            message: err.to_string(),
            health: HealthStatus::Skipped,
        });
    }

    /// Close the report, stamping duration.
    pub fn finish(&mut self) {
        let now = Utc::now();
        self.duration_ms = (now - self.started_at).num_milliseconds().max(0) as u64;
        self.finished_at = Some(now);
    }

    /// Number of executed stages that passed.
    pub fn passed_count(&self) -> usize {
        self.stages.iter().filter(|s| s.passed).count()
    }

    /// Whether the run reached `Done`.
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Done
    }

    /// Render the report as console text.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "run {} target={} environment={} state={:?}",
            self.run_id, self.target, self.environment, self.state
        );
        let _ = writeln!(out, "plan digest: {}", &self.plan_digest[..12]);

        if !self.stages.is_empty() {
            let _ = writeln!(
                out,
                "stages: {}/{} passed",
                self.passed_count(),
                self.stages.len()
            );
        }
        for stage in &self.stages {
            let verdict = if stage.passed { "ok" } else { "failed" };
            let _ = writeln!(
                out,
                "  stage {}: {} ({} ms, exit {})",
                stage.name, verdict, stage.duration_ms, stage.exit_code
            );
        }
        for warning in &self.warnings {
            let _ = writeln!(out, "warning: {warning}");
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "error: {error}");
        }
        if let Some(outcome) = &self.outcome {
            let _ = writeln!(
                out,
                "outcome: success={} health={:?} {}",
                outcome.success, outcome.health, outcome.message
            );
        }
        if !self.followups.is_empty() {
            let _ = writeln!(out, "manual follow-up:");
            for item in &self.followups {
                let _ = writeln!(out, "  - {item}");
            }
        }
        out
    }

    /// Render the report as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Checks the operator still has to do by hand after a successful run.
pub fn manual_followups() -> Vec<String> {
    vec![
        "hit the health endpoint and confirm the expected payload".to_string(),
        "open the site and check the browser console for errors".to_string(),
        "confirm static assets load from the deployed origin".to_string(),
    ]
}

/// Deterministic digest of the run plan identity.
///
/// Order-sensitive over the stage names, so reordering the pipeline yields
/// a different digest.
pub fn plan_digest(
    target: DeployTarget,
    environment: Environment,
    stage_names: &[String],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(target.name().as_bytes());
    hasher.update(b"\0");
    hasher.update(environment.name().as_bytes());
    hasher.update(b"\0");
    for name in stage_names {
        hasher.update(name.as_bytes());
        hasher.update(b"\0");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_digest_deterministic() {
        let stages = vec!["install".to_string(), "build".to_string()];
        let a = plan_digest(DeployTarget::Vercel, Environment::Production, &stages);
        let b = plan_digest(DeployTarget::Vercel, Environment::Production, &stages);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_plan_digest_order_sensitive() {
        let forward = vec!["install".to_string(), "build".to_string()];
        let reversed = vec!["build".to_string(), "install".to_string()];
        assert_ne!(
            plan_digest(DeployTarget::Vercel, Environment::Production, &forward),
            plan_digest(DeployTarget::Vercel, Environment::Production, &reversed)
        );
    }

    #[test]
    fn test_plan_digest_varies_by_target_and_environment() {
        let stages = vec!["install".to_string()];
        let base = plan_digest(DeployTarget::Vercel, Environment::Production, &stages);
        assert_ne!(
            base,
            plan_digest(DeployTarget::Netlify, Environment::Production, &stages)
        );
        assert_ne!(
            base,
            plan_digest(DeployTarget::Vercel, Environment::Staging, &stages)
        );
    }

    #[test]
    fn test_failed_outcome_never_reports_healthy() {
        let config = crate::config::DeployConfig::default();
        let plan = RunPlan::backend(
            DeployTarget::Render,
            Environment::Production,
            std::path::Path::new("."),
            &config,
        );
        let mut report = RunReport::start(&plan);
        report.fail(&DeployError::UnknownTarget("render".to_string()));
        report.finish();

        let outcome = report.outcome.as_ref().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.health, HealthStatus::Skipped);
        assert!(!report.succeeded());
    }

    #[test]
    fn test_render_text_mentions_error_and_warnings() {
        let config = crate::config::DeployConfig::default();
        let plan = RunPlan::backend(
            DeployTarget::Render,
            Environment::Production,
            std::path::Path::new("."),
            &config,
        );
        let mut report = RunReport::start(&plan);
        report.warnings.push("lint failed, continuing".to_string());
        report.fail(&DeployError::CredentialMissing {
            target: "render".to_string(),
            detail: "RENDER_DEPLOY_HOOK_URL is not set".to_string(),
        });
        report.finish();

        let text = report.render_text();
        assert!(text.contains("warning: lint failed"));
        assert!(text.contains("error: render credentials missing"));
    }
}
