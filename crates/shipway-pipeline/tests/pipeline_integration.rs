//! Integration tests for the build pipeline against a scratch workspace.

use shipway_pipeline::{BuildPipeline, PipelineError, StageConfig};

fn shell_stage(name: &str, script: &str) -> StageConfig {
    StageConfig::custom(
        name,
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        60,
    )
}

/// A realistic frontend-shaped pipeline: install and build are fatal, lint
/// and test are tolerated, and the build stage produces the artifact the
/// pipeline then locates.
#[tokio::test]
async fn test_frontend_shaped_pipeline_produces_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = BuildPipeline::new(dir.path());

    let stages = vec![
        shell_stage("install", "true"),
        shell_stage("lint", "exit 1").non_fatal(),
        shell_stage("test", "true").non_fatal(),
        shell_stage("build", "mkdir -p dist && touch dist/index.html"),
    ];

    let outcome = pipeline.run(&stages).await.expect("pipeline failed");
    assert_eq!(outcome.stages.len(), 4, "every stage should execute");
    assert_eq!(outcome.passed_count(), 3);
    assert_eq!(outcome.failed_count(), 1);
    assert_eq!(outcome.warnings.len(), 1, "lint failure becomes a warning");

    let artifact = pipeline
        .locate_artifact(&["dist".to_string(), "build".to_string(), "out".to_string()])
        .expect("artifact should exist");
    assert_eq!(artifact, dir.path().join("dist"));
    assert!(artifact.join("index.html").exists());
}

/// A fatal install failure aborts before any later stage runs.
#[tokio::test]
async fn test_fatal_install_failure_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = BuildPipeline::new(dir.path());

    let stages = vec![
        shell_stage("install", "echo 'registry unreachable' >&2; exit 7"),
        shell_stage("build", "mkdir -p dist"),
    ];

    let err = pipeline.run(&stages).await.unwrap_err();
    match err {
        PipelineError::StageFailed { stage, result } => {
            assert_eq!(stage, "install");
            assert_eq!(result.exit_code, 7);
            assert!(result.stderr.contains("registry unreachable"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(
        !dir.path().join("dist").exists(),
        "build stage must not run after a fatal failure"
    );
}

/// A timed-out fatal stage surfaces as a stage failure with the timeout
/// marked on the attached result.
#[tokio::test]
async fn test_timed_out_fatal_stage_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = BuildPipeline::new(dir.path());

    let stages = vec![StageConfig::custom(
        "slow",
        vec!["sleep".to_string(), "10".to_string()],
        1,
    )];

    let err = pipeline.run(&stages).await.unwrap_err();
    match err {
        PipelineError::StageFailed { stage, result } => {
            assert_eq!(stage, "slow");
            assert!(result.timed_out);
            assert_eq!(result.exit_code, -1);
        }
        other => panic!("unexpected error: {other}"),
    }
}
