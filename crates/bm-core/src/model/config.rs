//! Per-repository environment configuration.

use serde::{Deserialize, Serialize};

use super::env::Env;

/// One value per environment; `prod` is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,
    #[serde(default)]
    pub prod: String,
}

impl EnvTable {
    /// Value for `env`, treating blank entries as absent.
    pub fn get(&self, env: Env) -> Option<&str> {
        let value = match env {
            Env::Test => self.test.as_deref(),
            Env::Pre => self.pre.as_deref(),
            Env::Prod => Some(self.prod.as_str()),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, env: Env, value: Option<String>) {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        match env {
            Env::Test => self.test = value,
            Env::Pre => self.pre = value,
            Env::Prod => self.prod = value.unwrap_or_default(),
        }
    }
}

/// A fully configured environment: where to merge and where to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    pub env: Env,
    pub branch: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    pub branches: EnvTable,
    pub deploy_urls: EnvTable,
}

impl RepoConfig {
    pub fn new(prod_branch: impl Into<String>, prod_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.branches.prod = prod_branch.into();
        config.deploy_urls.prod = prod_url.into();
        config
    }

    pub fn with_env(
        mut self,
        env: Env,
        branch: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        self.branches.set(env, Some(branch.into()));
        self.deploy_urls.set(env, Some(url.into()));
        self
    }

    /// The deploy target for `env`, if both its branch and URL are set.
    pub fn target(&self, env: Env) -> Option<DeployTarget> {
        let branch = self.branches.get(env)?;
        let url = self.deploy_urls.get(env)?;
        Some(DeployTarget {
            env,
            branch: branch.to_string(),
            url: url.to_string(),
        })
    }

    /// Every fully configured environment, in promotion order.
    pub fn targets(&self) -> Vec<DeployTarget> {
        Env::ALL.iter().filter_map(|env| self.target(*env)).collect()
    }

    /// Names of all configured environment branches.
    pub fn env_branches(&self) -> Vec<&str> {
        Env::ALL
            .iter()
            .filter_map(|env| self.branches.get(*env))
            .collect()
    }

    pub fn is_env_branch(&self, branch: &str) -> bool {
        self.env_branches().contains(&branch)
    }

    /// Checks the invariants `set` enforces before saving.
    pub fn validate(&self) -> Result<(), String> {
        if self.branches.get(Env::Prod).is_none() {
            return Err("the production branch is required".to_string());
        }
        if self.deploy_urls.get(Env::Prod).is_none() {
            return Err("the production deploy URL is required".to_string());
        }
        for env in Env::ALL {
            let branch = self.branches.get(env);
            let url = self.deploy_urls.get(env);
            if branch.is_some() != url.is_some() {
                return Err(format!(
                    "the {} environment needs both a branch and a deploy URL",
                    env.label()
                ));
            }
            if let Some(url) = url {
                validate_url(url)?;
            }
        }
        let branches = self.env_branches();
        for (i, branch) in branches.iter().enumerate() {
            if branches[i + 1..].contains(branch) {
                return Err(format!(
                    "branch '{branch}' is assigned to more than one environment"
                ));
            }
        }
        Ok(())
    }
}

/// Deploy URLs must be absolute http(s) links.
pub fn validate_url(url: &str) -> Result<(), String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !url.contains(char::is_whitespace) => Ok(()),
        _ => Err(format!(
            "'{url}' is not a valid URL (must start with http:// or https://)"
        )),
    }
}
