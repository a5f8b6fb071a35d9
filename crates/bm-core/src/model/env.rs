//! Deployment environments and the feature lifecycle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A deployment environment. `prod` always exists; `test` and `pre` are
/// optional per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Test,
    Pre,
    Prod,
}

impl Env {
    /// In promotion order.
    pub const ALL: [Env; 3] = [Env::Test, Env::Pre, Env::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Pre => "pre",
            Self::Prod => "prod",
        }
    }

    /// Human-facing name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Pre => "staging",
            Self::Prod => "production",
        }
    }

    /// Status a feature reaches once a deploy to this environment is confirmed.
    pub fn deployed_status(&self) -> FeatureStatus {
        match self {
            Self::Test => FeatureStatus::DeployedTest,
            Self::Pre => FeatureStatus::DeployedStaging,
            Self::Prod => FeatureStatus::DeployedProduction,
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "pre" | "staging" => Ok(Self::Pre),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(format!(
                "unknown environment '{other}' (expected test, pre or prod)"
            )),
        }
    }
}

/// Lifecycle of a tracked feature branch.
///
/// `deployed-*` is only reached after a merged, pushed and operator-confirmed
/// deploy; `done` is set by hand. Older state files used other vocabularies,
/// which are read through the aliases below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureStatus {
    #[serde(alias = "开发中", alias = "on-hold")]
    Developing,
    #[serde(alias = "已发布测试", alias = "testing")]
    DeployedTest,
    #[serde(alias = "已发布预发", alias = "pending-release")]
    DeployedStaging,
    #[serde(alias = "已发布线上")]
    DeployedProduction,
    #[serde(alias = "已完成", alias = "completed", alias = "abandoned")]
    Done,
}

impl FeatureStatus {
    pub const ALL: [FeatureStatus; 5] = [
        FeatureStatus::Developing,
        FeatureStatus::DeployedTest,
        FeatureStatus::DeployedStaging,
        FeatureStatus::DeployedProduction,
        FeatureStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Developing => "developing",
            Self::DeployedTest => "deployed-test",
            Self::DeployedStaging => "deployed-staging",
            Self::DeployedProduction => "deployed-production",
            Self::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Developing => "Developing",
            Self::DeployedTest => "Deployed to test",
            Self::DeployedStaging => "Deployed to staging",
            Self::DeployedProduction => "Deployed to production",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown status '{s}' (expected one of: {})", names.join(", "))
            })
    }
}
