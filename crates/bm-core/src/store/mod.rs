//! Registry store
//!
//! Persists per-repository environment configuration and the list of tracked
//! feature branches. Both documents are keyed by repository identity and are
//! read once when the store opens. Each mutation is applied to a copy,
//! written in full, and only then becomes visible, so the in-memory view
//! never runs ahead of what is on disk.

mod backend;

pub use backend::{JsonFileBackend, MemoryBackend, Persistence};

use std::collections::BTreeMap;

use bm_fs::StoreLayout;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::model::{DeployRecord, Env, Feature, FeatureUpdate, RepoConfig, now};

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub repos: BTreeMap<String, RepoConfig>,
}

/// Contents of `state.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub repos: BTreeMap<String, RepoState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoState {
    #[serde(default)]
    pub features: Vec<Feature>,
}

pub struct RegistryStore {
    backend: Box<dyn Persistence>,
    config: ConfigDocument,
    state: StateDocument,
}

impl std::fmt::Debug for RegistryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryStore")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl RegistryStore {
    /// Load both documents from `backend`.
    pub fn open(backend: impl Persistence + 'static) -> Result<Self> {
        let config = backend.load_config()?;
        let state = backend.load_state()?;
        tracing::debug!(
            repos = config.repos.len(),
            tracked = state.repos.len(),
            "registry loaded"
        );
        Ok(Self {
            backend: Box::new(backend),
            config,
            state,
        })
    }

    /// Open the JSON files under `layout`, creating them when missing.
    pub fn open_dir(layout: &StoreLayout) -> Result<Self> {
        Self::open(JsonFileBackend::new(layout)?)
    }

    pub fn get_config(&self, repository: &str) -> Option<&RepoConfig> {
        self.config.repos.get(repository)
    }

    /// Replace the configuration for `repository`.
    pub fn set_config(&mut self, repository: &str, config: RepoConfig) -> Result<()> {
        let mut next = self.config.clone();
        next.repos.insert(repository.to_string(), config);
        self.backend.save_config(&next)?;
        self.config = next;
        tracing::info!(repository, "configuration saved");
        Ok(())
    }

    /// Tracked features of `repository` in insertion order.
    pub fn list_features(&self, repository: &str) -> &[Feature] {
        self.state
            .repos
            .get(repository)
            .map(|r| r.features.as_slice())
            .unwrap_or_default()
    }

    pub fn get_feature(&self, repository: &str, branch: &str) -> Option<&Feature> {
        self.list_features(repository)
            .iter()
            .find(|f| f.branch == branch)
    }

    /// Insert `feature`, replacing any record with the same branch in place.
    pub fn upsert_feature(&mut self, repository: &str, feature: Feature) -> Result<()> {
        let branch = feature.branch.clone();
        self.mutate_state(repository, move |features| {
            match features.iter_mut().find(|f| f.branch == feature.branch) {
                Some(existing) => *existing = feature,
                None => features.push(feature),
            }
            true
        })?;
        tracing::info!(repository, branch = %branch, "feature recorded");
        Ok(())
    }

    /// Apply `update` to a record and refresh its `updated_at`.
    ///
    /// Returns `false` without writing when the branch is not tracked.
    pub fn update_feature(
        &mut self,
        repository: &str,
        branch: &str,
        update: &FeatureUpdate,
    ) -> Result<bool> {
        let at = now();
        let updated = self.mutate_state(repository, |features| {
            match features.iter_mut().find(|f| f.branch == branch) {
                Some(feature) => {
                    update.apply(feature, at);
                    true
                }
                None => false,
            }
        })?;
        if updated {
            tracing::info!(repository, branch, ?update, "feature updated");
        }
        Ok(updated)
    }

    /// Returns `false` without writing when the branch is not tracked.
    pub fn remove_feature(&mut self, repository: &str, branch: &str) -> Result<bool> {
        let removed = self.mutate_state(repository, |features| {
            let before = features.len();
            features.retain(|f| f.branch != branch);
            features.len() != before
        })?;
        if removed {
            tracing::info!(repository, branch, "feature removed");
        }
        Ok(removed)
    }

    /// Append a deploy to a record's history. Untracked branches are ignored.
    pub fn append_deploy_history(
        &mut self,
        repository: &str,
        branch: &str,
        env: Env,
    ) -> Result<bool> {
        let at = now();
        let appended = self.mutate_state(repository, |features| {
            match features.iter_mut().find(|f| f.branch == branch) {
                Some(feature) => {
                    feature.deploy_history.push(DeployRecord { env, at });
                    feature.updated_at = at;
                    true
                }
                None => false,
            }
        })?;
        if appended {
            tracing::info!(repository, branch, %env, "deploy recorded");
        }
        Ok(appended)
    }

    /// Every repository that has tracked features.
    pub fn repositories(&self) -> impl Iterator<Item = (&str, &[Feature])> {
        self.state
            .repos
            .iter()
            .filter(|(_, r)| !r.features.is_empty())
            .map(|(id, r)| (id.as_str(), r.features.as_slice()))
    }

    /// Run `change` against a copy of the repository's feature list and
    /// persist it when `change` reports a modification.
    fn mutate_state<F>(&mut self, repository: &str, change: F) -> Result<bool>
    where
        F: FnOnce(&mut Vec<Feature>) -> bool,
    {
        let mut next = self.state.clone();
        let repo = next.repos.entry(repository.to_string()).or_default();
        if !change(&mut repo.features) {
            return Ok(false);
        }
        self.backend.save_state(&next)?;
        self.state = next;
        Ok(true)
    }
}
