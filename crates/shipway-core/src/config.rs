//! Run configuration, loaded once at startup.
//!
//! The loader is the only place Shipway reads the process environment.
//! Every other component receives this struct (or its snapshot) by
//! reference, which keeps prerequisite evaluation and deployer credential
//! checks deterministic and testable.

use crate::target::Environment;
use std::collections::BTreeMap;

/// Environment variables the loader consumes, in documentation order.
pub const CONSUMED_VARS: &[&str] = &[
    "VERCEL_TOKEN",
    "NETLIFY_AUTH_TOKEN",
    "NETLIFY_SITE_ID",
    "GITHUB_TOKEN",
    "RENDER_DEPLOY_HOOK_URL",
    "MONGODB_URI",
    "FRONTEND_URL",
    "BACKEND_URL",
    "VITE_API_BASE_URL",
    "REACT_APP_API_BASE_URL",
];

/// Explicit configuration for one run.
#[derive(Debug, Clone, Default)]
pub struct DeployConfig {
    snapshot: BTreeMap<String, String>,
}

impl DeployConfig {
    /// Capture the consumed variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(
            CONSUMED_VARS
                .iter()
                .copied()
                .filter_map(|name| std::env::var(name).ok().map(|v| (name.to_string(), v))),
        )
    }

    /// Build a configuration from explicit variables (used by tests and
    /// embedding callers). Empty values are treated as unset, matching how
    /// the shell treats `VAR=`.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let snapshot = vars.into_iter().filter(|(_, v)| !v.is_empty()).collect();
        Self { snapshot }
    }

    /// Look up a captured variable.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.snapshot.get(name).map(String::as_str)
    }

    /// Whether a captured variable is present and non-empty.
    pub fn is_set(&self, name: &str) -> bool {
        self.snapshot.contains_key(name)
    }

    /// Vercel API token.
    pub fn vercel_token(&self) -> Option<&str> {
        self.var("VERCEL_TOKEN")
    }

    /// Netlify API token.
    pub fn netlify_auth_token(&self) -> Option<&str> {
        self.var("NETLIFY_AUTH_TOKEN")
    }

    /// Netlify site to deploy into.
    pub fn netlify_site_id(&self) -> Option<&str> {
        self.var("NETLIFY_SITE_ID")
    }

    /// Token used by the gh-pages publishing flow.
    pub fn github_token(&self) -> Option<&str> {
        self.var("GITHUB_TOKEN")
    }

    /// Render deploy-hook URL; POSTing to it triggers a deploy.
    pub fn render_deploy_hook_url(&self) -> Option<&str> {
        self.var("RENDER_DEPLOY_HOOK_URL")
    }

    /// Public URL of the deployed frontend, used for health polling.
    pub fn frontend_url(&self) -> Option<&str> {
        self.var("FRONTEND_URL")
    }

    /// Public URL of the deployed backend, used for health polling.
    pub fn backend_url(&self) -> Option<&str> {
        self.var("BACKEND_URL")
    }

    /// Environment variables injected into build stages.
    ///
    /// `NODE_ENV` always reflects the run's environment; the API base URLs
    /// are forwarded only when configured.
    pub fn build_envs(&self, environment: Environment) -> Vec<(String, String)> {
        let mut envs = vec![("NODE_ENV".to_string(), environment.name().to_string())];
        for name in ["VITE_API_BASE_URL", "REACT_APP_API_BASE_URL"] {
            if let Some(value) = self.var(name) {
                envs.push((name.to_string(), value.to_string()));
            }
        }
        envs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> DeployConfig {
        DeployConfig::from_vars(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_var_lookup() {
        let config = vars(&[("VERCEL_TOKEN", "tok_123")]);
        assert_eq!(config.vercel_token(), Some("tok_123"));
        assert!(config.is_set("VERCEL_TOKEN"));
        assert!(!config.is_set("NETLIFY_AUTH_TOKEN"));
    }

    #[test]
    fn test_empty_value_is_unset() {
        let config = vars(&[("RENDER_DEPLOY_HOOK_URL", "")]);
        assert!(!config.is_set("RENDER_DEPLOY_HOOK_URL"));
        assert_eq!(config.render_deploy_hook_url(), None);
    }

    #[test]
    fn test_build_envs_sets_node_env() {
        let config = vars(&[]);
        let envs = config.build_envs(Environment::Staging);
        assert!(envs.contains(&("NODE_ENV".to_string(), "staging".to_string())));
    }

    #[test]
    fn test_build_envs_forwards_api_base_when_set() {
        let config = vars(&[("VITE_API_BASE_URL", "https://api.example.com")]);
        let envs = config.build_envs(Environment::Production);
        assert!(envs.contains(&(
            "VITE_API_BASE_URL".to_string(),
            "https://api.example.com".to_string()
        )));
        assert!(!envs.iter().any(|(k, _)| k == "REACT_APP_API_BASE_URL"));
    }
}
