//! Tracked feature records.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::env::{Env, FeatureStatus};

/// Current time at the precision the state file stores (milliseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// One confirmed deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRecord {
    pub env: Env,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub at: DateTime<Utc>,
}

/// A feature branch registered against a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub branch: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub base_branch: String,
    pub status: FeatureStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deploy_history: Vec<DeployRecord>,
}

impl Feature {
    /// A fresh record in the `developing` state.
    pub fn new(
        branch: impl Into<String>,
        doc: impl Into<String>,
        base_branch: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            branch: branch.into(),
            doc: doc.into(),
            base_branch: base_branch.into(),
            status: FeatureStatus::Developing,
            created_at: at,
            updated_at: at,
            deploy_history: Vec::new(),
        }
    }

    pub fn last_deploy(&self) -> Option<&DeployRecord> {
        self.deploy_history.last()
    }
}

/// Partial update applied by `RegistryStore::update_feature`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureUpdate {
    pub doc: Option<String>,
    pub base_branch: Option<String>,
    pub status: Option<FeatureStatus>,
}

impl FeatureUpdate {
    pub fn status(status: FeatureStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn doc(doc: impl Into<String>) -> Self {
        Self {
            doc: Some(doc.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_none() && self.base_branch.is_none() && self.status.is_none()
    }

    pub(crate) fn apply(&self, feature: &mut Feature, at: DateTime<Utc>) {
        if let Some(doc) = &self.doc {
            feature.doc = doc.clone();
        }
        if let Some(base) = &self.base_branch {
            feature.base_branch = base.clone();
        }
        if let Some(status) = self.status {
            feature.status = status;
        }
        feature.updated_at = at;
    }
}
