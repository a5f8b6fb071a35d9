//! Reporting on tracked branches and reconciling them with git.

use std::collections::BTreeMap;

use crate::model::{Feature, FeatureStatus, RepoConfig};
use crate::session::Session;
use crate::store::RegistryStore;
use crate::Result;

/// Where a tracked branch exists right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchPresence {
    Local,
    /// Only a remote-tracking ref is left.
    RemoteOnly,
    /// Gone from both; the record is stale.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureView {
    pub feature: Feature,
    pub presence: BranchPresence,
    pub is_current: bool,
}

/// Number of features per status, in lifecycle order.
pub type StatusTally = BTreeMap<FeatureStatus, usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    pub repository: String,
    pub current_branch: String,
    pub config: Option<RepoConfig>,
    pub features: Vec<FeatureView>,
    /// Tally over all tracked features, ignoring any filter.
    pub tally: StatusTally,
    /// Local branches that are neither tracked nor environment branches.
    pub untracked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    Pruned(Vec<String>),
    NothingToPrune,
    Cancelled,
}

fn tally(features: &[Feature]) -> StatusTally {
    let mut tally = StatusTally::new();
    for feature in features {
        *tally.entry(feature.status).or_default() += 1;
    }
    tally
}

/// Tracked features of the current repository with their git presence.
///
/// Remote presence comes from the remote-tracking refs as of the last fetch.
pub fn info(session: &Session<'_>, filter: Option<FeatureStatus>) -> Result<RepositoryReport> {
    session.require_repository()?;
    let repository = session.identity()?;
    let current_branch = session.vcs.current_branch()?;
    let local = session.vcs.local_branches()?;
    let remote = session.vcs.remote_branches()?;
    let config = session.store.get_config(&repository).cloned();
    let features = session.store.list_features(&repository);

    let views = features
        .iter()
        .filter(|f| filter.is_none_or(|status| f.status == status))
        .map(|feature| {
            let presence = if local.contains(&feature.branch) {
                BranchPresence::Local
            } else if remote.contains(&feature.branch) {
                BranchPresence::RemoteOnly
            } else {
                BranchPresence::Missing
            };
            FeatureView {
                is_current: feature.branch == current_branch,
                feature: feature.clone(),
                presence,
            }
        })
        .collect();

    let untracked = local
        .iter()
        .filter(|b| !features.iter().any(|f| &f.branch == *b))
        .filter(|b| !config.as_ref().is_some_and(|c| c.is_env_branch(b)))
        .cloned()
        .collect();

    Ok(RepositoryReport {
        repository,
        current_branch,
        config,
        features: views,
        tally: tally(features),
        untracked,
    })
}

/// Tracked features across every repository in the store.
pub fn list_all(
    store: &RegistryStore,
    filter: Option<FeatureStatus>,
) -> Vec<(String, Vec<Feature>, StatusTally)> {
    store
        .repositories()
        .filter_map(|(repository, features)| {
            let selected: Vec<Feature> = features
                .iter()
                .filter(|f| filter.is_none_or(|status| f.status == status))
                .cloned()
                .collect();
            if selected.is_empty() {
                return None;
            }
            Some((repository.to_string(), selected, tally(features)))
        })
        .collect()
}

/// Drop records whose branch exists neither locally nor on the remote.
pub fn prune(session: &mut Session<'_>, assume_yes: bool) -> Result<PruneOutcome> {
    let report = info(session, None)?;
    let stale: Vec<Feature> = report
        .features
        .into_iter()
        .filter(|v| v.presence == BranchPresence::Missing)
        .map(|v| v.feature)
        .collect();
    if stale.is_empty() {
        return Ok(PruneOutcome::NothingToPrune);
    }
    if !assume_yes && !session.ui.confirm_prune(&stale)? {
        return Ok(PruneOutcome::Cancelled);
    }

    let mut pruned = Vec::with_capacity(stale.len());
    for feature in stale {
        if session
            .store
            .remove_feature(&report.repository, &feature.branch)?
        {
            pruned.push(feature.branch);
        }
    }
    tracing::info!(repository = %report.repository, count = pruned.len(), "stale records pruned");
    Ok(PruneOutcome::Pruned(pruned))
}
