//! Release state machine
//!
//! Promotes the checked-out feature branch into an environment branch:
//! sync the target, merge, push, trigger the deploy page, wait for the
//! operator to confirm, then advance the feature's status.
//!
//! ```text
//! Idle -> EnvironmentSelected -> Syncing -> Merging -> Merged -> Pushed
//!      -> AwaitingDeployConfirmation -> Completed
//! Merging -> ConflictPending -> Merging (resolved) | Aborted
//! ```
//!
//! Preconditions are checked before anything touches git. Once the target
//! branch is checked out, any fatal failure that leaves a merge in progress
//! aborts that merge before the error is returned.

use std::fmt;

use crate::interaction::{ConflictAction, Notice};
use crate::model::{DeployTarget, Env, Feature, FeatureStatus, FeatureUpdate};
use crate::session::Session;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    Idle,
    EnvironmentSelected,
    Syncing,
    Merging,
    ConflictPending,
    Merged,
    Pushed,
    AwaitingDeployConfirmation,
    Completed,
    Aborted,
}

impl ReleaseState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: ReleaseState) -> bool {
        use ReleaseState::*;
        matches!(
            (self, next),
            (Idle, EnvironmentSelected)
                | (EnvironmentSelected, Syncing)
                | (Syncing, Merging)
                | (Merging, Merged)
                | (Merging, ConflictPending)
                | (ConflictPending, Merging)
                | (ConflictPending, Aborted)
                | (Merged, Pushed)
                | (Pushed, AwaitingDeployConfirmation)
                | (AwaitingDeployConfirmation, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

impl fmt::Display for ReleaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::EnvironmentSelected => "environment-selected",
            Self::Syncing => "syncing",
            Self::Merging => "merging",
            Self::ConflictPending => "conflict-pending",
            Self::Merged => "merged",
            Self::Pushed => "pushed",
            Self::AwaitingDeployConfirmation => "awaiting-deploy-confirmation",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Options that skip the matching prompts.
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub env: Option<Env>,
    /// Switch back to the feature branch afterwards (`None` asks).
    pub return_to_source: Option<bool>,
}

/// Operator declined before any git operation ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancellation {
    UntrackedBranch,
    ProductionNotConfirmed,
    PromotionDeclined,
}

/// What happened to the registry after a confirmed deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bookkeeping {
    Recorded(FeatureStatus),
    /// The branch has no record, so nothing was written.
    Untracked,
    /// The deploy happened but the record could not be updated.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    Returned,
    Stayed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub source: String,
    pub target: DeployTarget,
    pub bookkeeping: Bookkeeping,
    pub returned: ReturnOutcome,
    /// Every state the release passed through.
    pub trail: Vec<ReleaseState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Cancelled(Cancellation),
    /// Conflicts were left unresolved and the merge was aborted.
    MergeAborted { source: String, target: DeployTarget },
    /// Merged and pushed, but the operator did not confirm the deploy. The
    /// work tree stays on the target branch.
    Unconfirmed { source: String, target: DeployTarget },
    Completed(DeployReport),
}

/// Everything settled before the first git operation.
#[derive(Debug)]
struct ReleasePlan {
    repository: String,
    source: String,
    feature: Option<Feature>,
    target: DeployTarget,
}

/// Deploy the checked-out feature branch.
pub fn deploy(session: &mut Session<'_>, request: &DeployRequest) -> Result<DeployOutcome> {
    match plan(session, request)? {
        Ok(plan) => Release::new(session, plan).run(request),
        Err(cancelled) => {
            tracing::info!(?cancelled, "deploy cancelled");
            Ok(DeployOutcome::Cancelled(cancelled))
        }
    }
}

fn plan(
    session: &mut Session<'_>,
    request: &DeployRequest,
) -> Result<std::result::Result<ReleasePlan, Cancellation>> {
    session.require_repository()?;
    session.require_clean_tree()?;
    let repository = session.identity()?;
    let source = session.current_branch()?;
    let config = session.require_config(&repository)?;

    if config.is_env_branch(&source) {
        return Err(Error::CannotDeployEnvironmentBranch { branch: source });
    }

    let targets = config.targets();
    if targets.is_empty() {
        return Err(Error::NoEnvironmentConfigured);
    }
    let preset = request
        .env
        .map(|env| config.target(env).ok_or(Error::IncompleteEnvironment { env }))
        .transpose()?;

    let feature = session.store.get_feature(&repository, &source).cloned();
    if feature.is_none() && !session.ui.confirm_untracked_deploy(&source)? {
        return Ok(Err(Cancellation::UntrackedBranch));
    }

    let target = match preset {
        Some(target) => target,
        None => session.ui.select_environment(&targets)?,
    };

    if target.env == Env::Prod {
        if !session.ui.confirm_production(&source, &target)? {
            return Ok(Err(Cancellation::ProductionNotConfirmed));
        }
        if let Some(feature) = feature
            .as_ref()
            .filter(|f| f.status != FeatureStatus::DeployedStaging)
        {
            session.notify(Notice::OutOfOrderPromotion {
                branch: source.clone(),
                status: feature.status,
            });
            if !session.ui.confirm_out_of_order_promotion(feature)? {
                return Ok(Err(Cancellation::PromotionDeclined));
            }
        }
    }

    tracing::info!(
        repository = %repository,
        source = %source,
        env = %target.env,
        target = %target.branch,
        "release planned"
    );
    Ok(Ok(ReleasePlan {
        repository,
        source,
        feature,
        target,
    }))
}

struct Release<'s, 'a> {
    session: &'s mut Session<'a>,
    plan: ReleasePlan,
    state: ReleaseState,
    trail: Vec<ReleaseState>,
}

impl<'s, 'a> Release<'s, 'a> {
    fn new(session: &'s mut Session<'a>, plan: ReleasePlan) -> Self {
        Self {
            session,
            plan,
            state: ReleaseState::Idle,
            trail: vec![ReleaseState::Idle],
        }
    }

    fn run(mut self, request: &DeployRequest) -> Result<DeployOutcome> {
        self.advance(ReleaseState::EnvironmentSelected);
        self.sync()?;

        if !self.merge()? {
            return Ok(DeployOutcome::MergeAborted {
                source: self.plan.source,
                target: self.plan.target,
            });
        }

        self.push()?;
        self.trigger_deploy();

        self.advance(ReleaseState::AwaitingDeployConfirmation);
        if !self.session.ui.confirm_deploy_finished(&self.plan.target)? {
            tracing::info!(target = %self.plan.target.branch, "deploy not confirmed");
            return Ok(DeployOutcome::Unconfirmed {
                source: self.plan.source,
                target: self.plan.target,
            });
        }

        self.advance(ReleaseState::Completed);
        let bookkeeping = self.record();
        let returned = self.return_to_source(request.return_to_source)?;

        Ok(DeployOutcome::Completed(DeployReport {
            source: self.plan.source,
            target: self.plan.target,
            bookkeeping,
            returned,
            trail: self.trail,
        }))
    }

    fn advance(&mut self, next: ReleaseState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal release transition {} -> {}",
            self.state,
            next
        );
        tracing::info!(from = %self.state, to = %next, "release state");
        self.state = next;
        self.trail.push(next);
    }

    /// Bring the target branch up to date with the remote.
    fn sync(&mut self) -> Result<()> {
        self.advance(ReleaseState::Syncing);
        let target = self.plan.target.branch.clone();
        let vcs = self.session.vcs;

        self.session.notify(Notice::Syncing {
            branch: target.clone(),
        });
        vcs.fetch()?;

        if vcs.has_local_branch(&target)? {
            vcs.checkout(&target)?;
        } else if vcs.has_remote_branch(&target)? {
            let upstream = format!("{}/{}", bm_git::REMOTE, target);
            vcs.create_and_checkout(&target, &upstream)?;
            self.session.notify(Notice::TrackingRemoteBranch {
                branch: target.clone(),
            });
        } else {
            return Err(Error::TargetBranchMissing { branch: target });
        }

        if let Err(source) = vcs.pull(&target) {
            self.abort_if_merging();
            return Err(Error::PullFailed {
                branch: target,
                source,
            });
        }
        Ok(())
    }

    /// Returns `false` when the operator aborted a conflicted merge.
    fn merge(&mut self) -> Result<bool> {
        self.advance(ReleaseState::Merging);
        let source = self.plan.source.clone();
        let target = self.plan.target.branch.clone();
        let vcs = self.session.vcs;

        self.session.notify(Notice::Merging {
            source: source.clone(),
            target: target.clone(),
        });

        if let Err(failure) = vcs.merge(&source) {
            if !vcs.has_merge_conflicts()? {
                self.abort_if_merging();
                return Err(Error::UnrecoverableMergeFailure {
                    branch: source,
                    target,
                    source: failure,
                });
            }
            tracing::warn!(source = %source, target = %target, "merge stopped on conflicts");
            if !self.resolve_conflicts(&source, &target)? {
                return Ok(false);
            }
        }

        self.advance(ReleaseState::Merged);
        self.session.notify(Notice::Merged { source, target });
        Ok(true)
    }

    fn resolve_conflicts(&mut self, source: &str, target: &str) -> Result<bool> {
        self.advance(ReleaseState::ConflictPending);
        self.session.notify(Notice::MergeConflict {
            source: source.to_string(),
            target: target.to_string(),
        });

        let action = self
            .session
            .ui
            .choose_conflict_action(source, target)
            .inspect_err(|_| self.abort_if_merging())?;

        match action {
            ConflictAction::Abort => {
                self.session.vcs.abort_merge()?;
                self.advance(ReleaseState::Aborted);
                self.session.notify(Notice::MergeAborted {
                    target: target.to_string(),
                });
                Ok(false)
            }
            ConflictAction::Resolve => {
                self.session
                    .ui
                    .wait_for_conflict_resolution(target)
                    .inspect_err(|_| self.abort_if_merging())?;
                self.advance(ReleaseState::Merging);
                if let Err(source) = self.session.vcs.continue_merge() {
                    self.abort_if_merging();
                    return Err(Error::ContinueMergeFailed { source });
                }
                Ok(true)
            }
        }
    }

    fn push(&mut self) -> Result<()> {
        let target = self.plan.target.branch.clone();
        self.session.notify(Notice::Pushing {
            branch: target.clone(),
        });
        // The merge commit stays local on failure; there is nothing to abort.
        self.session
            .vcs
            .push(Some(&target))
            .map_err(|source| Error::PushFailed {
                branch: target.clone(),
                source,
            })?;
        self.advance(ReleaseState::Pushed);
        self.session.notify(Notice::Pushed { branch: target });
        Ok(())
    }

    fn trigger_deploy(&mut self) {
        let url = self.plan.target.url.clone();
        self.session
            .notify(Notice::OpeningDeployPage { url: url.clone() });
        if let Err(e) = self.session.ui.open_deploy_page(&url) {
            tracing::warn!(url = %url, error = %e, "could not open deploy page");
            self.session.notify(Notice::DeployPageUnavailable {
                url,
                reason: e.to_string(),
            });
        }
    }

    /// Advance the feature's status and history. Never fails the release.
    fn record(&mut self) -> Bookkeeping {
        if self.plan.feature.is_none() {
            return Bookkeeping::Untracked;
        }
        let status = self.plan.target.env.deployed_status();
        let repository = &self.plan.repository;
        let branch = &self.plan.source;

        let result = self
            .session
            .store
            .update_feature(repository, branch, &FeatureUpdate::status(status))
            .and_then(|updated| {
                if updated {
                    self.session
                        .store
                        .append_deploy_history(repository, branch, self.plan.target.env)
                } else {
                    Ok(false)
                }
            });

        match result {
            Ok(true) => {
                self.session.notify(Notice::StatusRecorded {
                    branch: branch.clone(),
                    status,
                });
                Bookkeeping::Recorded(status)
            }
            Ok(false) => {
                let reason = "the record disappeared during the deploy".to_string();
                tracing::warn!(branch = %branch, "{reason}");
                self.session.notify(Notice::BookkeepingFailed {
                    branch: branch.clone(),
                    reason: reason.clone(),
                });
                Bookkeeping::Failed(reason)
            }
            Err(e) => {
                tracing::warn!(branch = %branch, error = %e, "could not record deploy");
                self.session.notify(Notice::BookkeepingFailed {
                    branch: branch.clone(),
                    reason: e.to_string(),
                });
                Bookkeeping::Failed(e.to_string())
            }
        }
    }

    fn return_to_source(&mut self, preset: Option<bool>) -> Result<ReturnOutcome> {
        let source = self.plan.source.clone();
        let wanted = match preset {
            Some(wanted) => wanted,
            None => self.session.ui.confirm_return_to_branch(&source)?,
        };
        if !wanted {
            return Ok(ReturnOutcome::Stayed);
        }
        match self.session.vcs.checkout(&source) {
            Ok(()) => {
                self.session
                    .notify(Notice::ReturnedToBranch { branch: source });
                Ok(ReturnOutcome::Returned)
            }
            Err(e) => {
                tracing::warn!(branch = %source, error = %e, "could not return to branch");
                self.session.notify(Notice::ReturnFailed {
                    branch: source,
                    reason: e.to_string(),
                });
                Ok(ReturnOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Leave the work tree without a half-finished merge. Best effort.
    fn abort_if_merging(&self) {
        let vcs = self.session.vcs;
        match vcs.is_merge_in_progress() {
            Ok(true) => {
                if let Err(e) = vcs.abort_merge() {
                    tracing::warn!(error = %e, "could not abort merge");
                } else {
                    tracing::info!("merge aborted");
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "could not inspect merge state"),
        }
    }
}
