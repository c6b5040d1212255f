//! Shipway Core Library
//!
//! Orchestrates one deployment run end to end: prerequisite checks, the
//! build pipeline, dispatch to a single platform deployer, and post-deploy
//! health verification. Runs are stateless; the only output is the report.

pub mod config;
pub mod deploy;
pub mod error;
pub mod health;
pub mod orchestrator;
pub mod plan;
pub mod prereq;
pub mod report;
pub mod target;
pub mod telemetry;

pub use config::{DeployConfig, CONSUMED_VARS};
pub use deploy::{
    Deployer, DeployerRegistry, GitHubPagesDeployer, HerokuDeployer, NetlifyDeployer,
    RailwayDeployer, RenderDeployer, VercelDeployer,
};
pub use error::{DeployError, Result};
pub use health::{HealthPoller, HealthProbe, HealthStatus, HttpProbe};
pub use orchestrator::{Orchestrator, RunState};
pub use plan::{RunPlan, ARTIFACT_CANDIDATES};
pub use prereq::{PrerequisiteChecker, PrerequisiteReport, Requirement, Rule, RuleOutcome};
pub use report::{manual_followups, plan_digest, DeploymentOutcome, RunReport, StageSummary};
pub use target::{DeployTarget, Environment, TargetKind};
pub use telemetry::init_tracing;
