//! Shared entry plumbing for the `deploy-frontend` and `deploy-backend`
//! binaries: argument parsing, logging setup, and exit-code mapping.

use anyhow::{Context, Result};
use clap::Parser;
use shipway_core::{
    init_tracing, DeployConfig, DeployTarget, DeployerRegistry, Environment, HealthPoller,
    Orchestrator, PrerequisiteChecker, RunPlan, TargetKind,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Health polling budget: 30 attempts, 10 seconds apart.
const HEALTH_INTERVAL: Duration = Duration::from_secs(10);
const HEALTH_MAX_ATTEMPTS: u32 = 30;

/// Command-line arguments shared by both deploy binaries.
#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "Build and deploy a web workload to a hosting platform")]
pub struct DeployArgs {
    /// Platform to deploy to (defaults to the workload's standard platform)
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Deployment environment: production or staging
    #[arg(value_name = "ENVIRONMENT", default_value = "production")]
    pub environment: String,

    /// Project root containing package.json
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Verify prerequisites and credentials, then exit
    #[arg(long)]
    pub check: bool,

    /// Skip post-deploy health polling
    #[arg(long)]
    pub skip_health: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines and report
    #[arg(long)]
    pub json: bool,
}

/// Parse argv and run one deployment for `kind`.
///
/// Exit code 1 for every fatal condition (unknown target, unmet mandatory
/// prerequisite, failed build or deploy); 0 otherwise, even when warnings
/// were emitted.
pub async fn run(kind: TargetKind) -> Result<()> {
    let args = DeployArgs::parse();
    run_with(kind, args).await
}

/// Run one deployment with already-parsed arguments.
pub async fn run_with(kind: TargetKind, args: DeployArgs) -> Result<()> {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(args.json, level);

    let config = DeployConfig::from_env();
    let target = match &args.target {
        Some(name) => DeployTarget::parse_for(kind, name)?,
        None => kind.default_target(),
    };
    let environment: Environment = args.environment.parse()?;

    let mut plan = RunPlan::for_kind(kind, target, environment, &args.workspace, &config);
    if args.skip_health {
        plan = plan.skip_health();
    }

    let registry = DeployerRegistry::standard(&config, &args.workspace, environment);

    if args.check {
        return check_only(&config, &registry, &plan);
    }

    let poller = HealthPoller::new(HEALTH_INTERVAL, HEALTH_MAX_ATTEMPTS);
    let orchestrator = Orchestrator::new(config, registry, poller);
    let report = orchestrator.run(&plan).await;

    if args.json {
        println!("{}", report.to_json().context("failed to encode report")?);
    } else {
        print!("{}", report.render_text());
    }

    if !report.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

/// `--check` mode: evaluate prerequisites and credentials, print the
/// report, and exit without building or deploying.
fn check_only(config: &DeployConfig, registry: &DeployerRegistry, plan: &RunPlan) -> Result<()> {
    let checker = PrerequisiteChecker::new(config, &plan.workspace);
    let mut report = checker.check(&plan.prerequisites);
    let deployer = registry.resolve(plan.target)?;
    report.merge(deployer.validate_credentials(&checker));

    for entry in &report.entries {
        let marker = if entry.satisfied {
            "ok"
        } else if entry.mandatory {
            "missing"
        } else {
            "warn"
        };
        println!("{marker:8}{} - {}", entry.name, entry.detail);
    }

    if !report.satisfied() {
        std::process::exit(1);
    }
    println!("all mandatory prerequisites satisfied");
    Ok(())
}
