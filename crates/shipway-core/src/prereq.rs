//! Prerequisite rules and evaluation.

use crate::config::DeployConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// A single condition to verify before a run proceeds.
#[derive(Debug, Clone)]
pub enum Rule {
    /// A path that must exist, relative to the workspace root.
    FileExists(PathBuf),

    /// An executable that must be invocable from PATH.
    ToolOnPath(String),

    /// A variable that must be present in the config snapshot.
    EnvVarSet(String),
}

impl Rule {
    /// Stable display name used in reports (`file:`, `tool:`, `env:` prefix).
    pub fn name(&self) -> String {
        match self {
            Rule::FileExists(path) => format!("file:{}", path.display()),
            Rule::ToolOnPath(tool) => format!("tool:{tool}"),
            Rule::EnvVarSet(var) => format!("env:{var}"),
        }
    }
}

/// A rule plus its severity.
#[derive(Debug, Clone)]
pub struct Requirement {
    pub rule: Rule,
    pub mandatory: bool,
}

impl Requirement {
    /// A mandatory requirement; failing it halts the run.
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            mandatory: true,
        }
    }

    /// An advisory requirement; failing it only produces a warning.
    pub fn advisory(rule: Rule) -> Self {
        Self {
            rule,
            mandatory: false,
        }
    }
}

/// Outcome of evaluating one requirement.
#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    pub name: String,
    pub satisfied: bool,
    pub mandatory: bool,
    pub detail: String,
}

/// Ordered evaluation results: exactly one entry per input requirement,
/// in input order. Never mutated after creation except by [`merge`].
///
/// [`merge`]: PrerequisiteReport::merge
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrerequisiteReport {
    pub entries: Vec<RuleOutcome>,
}

impl PrerequisiteReport {
    /// Whether every mandatory entry is satisfied.
    pub fn satisfied(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| entry.satisfied || !entry.mandatory)
    }

    /// Names of unsatisfied mandatory entries, in report order.
    pub fn unsatisfied_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.mandatory && !entry.satisfied)
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Warning lines for unsatisfied advisory entries.
    pub fn advisory_warnings(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| !entry.mandatory && !entry.satisfied)
            .map(|entry| format!("{}: {}", entry.name, entry.detail))
            .collect()
    }

    /// Append another report's entries, preserving order.
    pub fn merge(&mut self, other: PrerequisiteReport) {
        self.entries.extend(other.entries);
    }
}

/// Evaluates requirements against the filesystem, PATH, and the config
/// snapshot.
pub struct PrerequisiteChecker<'a> {
    config: &'a DeployConfig,
    workspace: PathBuf,
}

impl<'a> PrerequisiteChecker<'a> {
    /// Create a checker rooted at `workspace`.
    pub fn new(config: &'a DeployConfig, workspace: impl Into<PathBuf>) -> Self {
        Self {
            config,
            workspace: workspace.into(),
        }
    }

    /// Evaluate every requirement; the report is always complete.
    ///
    /// No short-circuiting: an early failure must not hide later ones, so
    /// the operator sees everything that needs fixing in one pass.
    pub fn check(&self, requirements: &[Requirement]) -> PrerequisiteReport {
        let entries = requirements
            .iter()
            .map(|req| self.evaluate(req))
            .collect();
        PrerequisiteReport { entries }
    }

    fn evaluate(&self, requirement: &Requirement) -> RuleOutcome {
        let (satisfied, detail) = match &requirement.rule {
            Rule::FileExists(path) => {
                let resolved = self.workspace.join(path);
                if resolved.exists() {
                    (true, format!("{} exists", resolved.display()))
                } else {
                    (false, format!("{} not found", resolved.display()))
                }
            }
            Rule::ToolOnPath(tool) => {
                if tool_on_path(tool) {
                    (true, format!("{tool} is on PATH"))
                } else {
                    (false, format!("{tool} is not installed or not on PATH"))
                }
            }
            Rule::EnvVarSet(var) => {
                if self.config.is_set(var) {
                    (true, format!("{var} is set"))
                } else {
                    (false, format!("{var} is not set"))
                }
            }
        };

        debug!(rule = %requirement.rule.name(), satisfied, "evaluated prerequisite");
        RuleOutcome {
            name: requirement.rule.name(),
            satisfied,
            mandatory: requirement.mandatory,
            detail,
        }
    }

    /// Workspace root the file rules resolve against.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }
}

/// Probe a tool by invoking `<tool> --version`.
fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> DeployConfig {
        DeployConfig::from_vars(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_one_entry_per_rule_in_input_order() {
        let cfg = config(&[("FRONTEND_URL", "https://example.com")]);
        let checker = PrerequisiteChecker::new(&cfg, ".");
        let requirements = vec![
            Requirement::new(Rule::EnvVarSet("FRONTEND_URL".to_string())),
            Requirement::new(Rule::EnvVarSet("MISSING_ONE".to_string())),
            Requirement::advisory(Rule::EnvVarSet("MISSING_TWO".to_string())),
        ];

        let report = checker.check(&requirements);
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[0].name, "env:FRONTEND_URL");
        assert_eq!(report.entries[1].name, "env:MISSING_ONE");
        assert_eq!(report.entries[2].name, "env:MISSING_TWO");
    }

    #[test]
    fn test_no_short_circuit_on_failure() {
        let cfg = config(&[]);
        let checker = PrerequisiteChecker::new(&cfg, ".");
        let requirements = vec![
            Requirement::new(Rule::EnvVarSet("A".to_string())),
            Requirement::new(Rule::EnvVarSet("B".to_string())),
        ];

        let report = checker.check(&requirements);
        assert_eq!(report.entries.len(), 2, "both rules evaluated");
        assert_eq!(
            report.unsatisfied_names(),
            vec!["env:A".to_string(), "env:B".to_string()]
        );
    }

    #[test]
    fn test_advisory_failure_does_not_halt() {
        let cfg = config(&[]);
        let checker = PrerequisiteChecker::new(&cfg, ".");
        let requirements = vec![Requirement::advisory(Rule::EnvVarSet(
            "OPTIONAL".to_string(),
        ))];

        let report = checker.check(&requirements);
        assert!(report.satisfied());
        assert_eq!(report.advisory_warnings().len(), 1);
    }

    #[test]
    fn test_env_rule_reads_snapshot_not_ambient_env() {
        // Set a real process variable; the checker must not see it because
        // the config snapshot does not contain it.
        std::env::set_var("SHIPWAY_AMBIENT_ONLY", "1");
        let cfg = config(&[]);
        let checker = PrerequisiteChecker::new(&cfg, ".");
        let report = checker.check(&[Requirement::new(Rule::EnvVarSet(
            "SHIPWAY_AMBIENT_ONLY".to_string(),
        ))]);
        std::env::remove_var("SHIPWAY_AMBIENT_ONLY");

        assert!(!report.entries[0].satisfied);
    }

    #[test]
    fn test_file_rule_resolves_against_workspace() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), b"{}").unwrap();

        let cfg = config(&[]);
        let checker = PrerequisiteChecker::new(&cfg, dir.path());
        let report = checker.check(&[
            Requirement::new(Rule::FileExists(PathBuf::from("package.json"))),
            Requirement::new(Rule::FileExists(PathBuf::from("missing.json"))),
        ]);

        assert!(report.entries[0].satisfied);
        assert!(!report.entries[1].satisfied);
    }

    #[test]
    fn test_tool_on_path_probe() {
        let cfg = config(&[]);
        let checker = PrerequisiteChecker::new(&cfg, ".");
        let report = checker.check(&[
            Requirement::new(Rule::ToolOnPath("sh".to_string())),
            Requirement::new(Rule::ToolOnPath(
                "nonexistent-tool-that-does-not-exist".to_string(),
            )),
        ]);

        assert!(report.entries[0].satisfied);
        assert!(!report.entries[1].satisfied);
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut first = PrerequisiteReport {
            entries: vec![RuleOutcome {
                name: "a".to_string(),
                satisfied: true,
                mandatory: true,
                detail: String::new(),
            }],
        };
        let second = PrerequisiteReport {
            entries: vec![RuleOutcome {
                name: "b".to_string(),
                satisfied: false,
                mandatory: true,
                detail: String::new(),
            }],
        };

        first.merge(second);
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.entries[1].name, "b");
        assert!(!first.satisfied());
    }
}
