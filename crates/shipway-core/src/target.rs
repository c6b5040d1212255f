//! Deploy targets and runtime environments.

use crate::error::DeployError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platforms Shipway can deploy to.
///
/// The set is closed: adding a platform means adding a variant, a deployer,
/// and a registry entry, so a misspelled target is a construction-time error
/// rather than a silent fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployTarget {
    Vercel,
    Netlify,
    #[serde(rename = "github-pages")]
    GitHubPages,
    Render,
    Railway,
    Heroku,
}

impl DeployTarget {
    /// Every supported target, frontend platforms first.
    pub const ALL: [DeployTarget; 6] = [
        DeployTarget::Vercel,
        DeployTarget::Netlify,
        DeployTarget::GitHubPages,
        DeployTarget::Render,
        DeployTarget::Railway,
        DeployTarget::Heroku,
    ];

    /// Get the target name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            DeployTarget::Vercel => "vercel",
            DeployTarget::Netlify => "netlify",
            DeployTarget::GitHubPages => "github-pages",
            DeployTarget::Render => "render",
            DeployTarget::Railway => "railway",
            DeployTarget::Heroku => "heroku",
        }
    }

    /// Which workload class this platform serves.
    pub fn kind(&self) -> TargetKind {
        match self {
            DeployTarget::Vercel | DeployTarget::Netlify | DeployTarget::GitHubPages => {
                TargetKind::Frontend
            }
            DeployTarget::Render | DeployTarget::Railway | DeployTarget::Heroku => {
                TargetKind::Backend
            }
        }
    }

    /// Parse a target name, restricted to the platforms serving `kind`.
    ///
    /// A backend target handed to the frontend command (and vice versa) is
    /// rejected the same way an unknown name is.
    pub fn parse_for(kind: TargetKind, name: &str) -> Result<Self, DeployError> {
        DeployTarget::ALL
            .into_iter()
            .find(|t| t.name() == name && t.kind() == kind)
            .ok_or_else(|| DeployError::UnknownTarget(name.to_string()))
    }
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Workload class a deploy command serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Frontend,
    Backend,
}

impl TargetKind {
    /// The target used when none is given on the command line.
    pub fn default_target(&self) -> DeployTarget {
        match self {
            TargetKind::Frontend => DeployTarget::Vercel,
            TargetKind::Backend => DeployTarget::Render,
        }
    }

    /// Targets serving this workload class.
    pub fn targets(&self) -> Vec<DeployTarget> {
        DeployTarget::ALL
            .into_iter()
            .filter(|t| t.kind() == *self)
            .collect()
    }
}

/// Deployment environment, fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Staging,
}

impl Environment {
    /// Get the environment name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
        }
    }

    /// Whether this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            other => Err(DeployError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_names_round_trip() {
        for target in DeployTarget::ALL {
            let parsed = DeployTarget::parse_for(target.kind(), target.name()).unwrap();
            assert_eq!(parsed, target);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_name() {
        let err = DeployTarget::parse_for(TargetKind::Frontend, "fly").unwrap_err();
        assert!(matches!(err, DeployError::UnknownTarget(name) if name == "fly"));
    }

    #[test]
    fn test_parse_rejects_wrong_kind() {
        // heroku is a backend platform; the frontend command must not accept it
        let err = DeployTarget::parse_for(TargetKind::Frontend, "heroku").unwrap_err();
        assert!(matches!(err, DeployError::UnknownTarget(_)));

        let err = DeployTarget::parse_for(TargetKind::Backend, "vercel").unwrap_err();
        assert!(matches!(err, DeployError::UnknownTarget(_)));
    }

    #[test]
    fn test_kind_defaults() {
        assert_eq!(TargetKind::Frontend.default_target(), DeployTarget::Vercel);
        assert_eq!(TargetKind::Backend.default_target(), DeployTarget::Render);
    }

    #[test]
    fn test_kind_partitions_all_targets() {
        let frontend = TargetKind::Frontend.targets();
        let backend = TargetKind::Backend.targets();
        assert_eq!(frontend.len() + backend.len(), DeployTarget::ALL.len());
        assert!(frontend.contains(&DeployTarget::GitHubPages));
        assert!(backend.contains(&DeployTarget::Railway));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            "staging".parse::<Environment>().unwrap(),
            Environment::Staging
        );
        assert_eq!(Environment::default(), Environment::Production);
        assert!("prod".parse::<Environment>().is_err());
    }
}
