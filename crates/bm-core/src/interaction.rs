//! Operator interaction port
//!
//! Every question the branch manager asks goes through [`Interaction`], so the
//! same flows run behind a terminal prompt or a scripted test double.
//! Declining a confirmation is an ordinary answer (`Ok(false)`); an `Err`
//! means the prompt itself could not be shown or was interrupted.

use crate::Result;
use crate::model::{DeployTarget, Feature, FeatureStatus, FeatureUpdate, RepoConfig};

/// How `add` obtains its branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    /// Create a new branch from the production branch.
    Create,
    /// Track a local branch that already exists.
    Existing,
}

/// What to do when a merge stops on conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Resolve by hand in the working tree, then conclude the merge.
    Resolve,
    Abort,
}

/// What `checkout` does with uncommitted changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyPolicy {
    /// Commit everything with a generated message.
    AutoCommit,
    /// Stop so the operator can commit by hand.
    Manual,
    Cancel,
}

/// Why a feature is being picked from the tracked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectPurpose {
    Remove,
    Edit,
}

/// Progress reported while an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Syncing { branch: String },
    TrackingRemoteBranch { branch: String },
    PullSkipped { branch: String, reason: String },
    CreatingBranch { branch: String, base: String },
    Merging { source: String, target: String },
    MergeConflict { source: String, target: String },
    Merged { source: String, target: String },
    MergeAborted { target: String },
    Pushing { branch: String },
    Pushed { branch: String },
    OpeningDeployPage { url: String },
    DeployPageUnavailable { url: String, reason: String },
    OutOfOrderPromotion { branch: String, status: FeatureStatus },
    StatusRecorded { branch: String, status: FeatureStatus },
    BookkeepingFailed { branch: String, reason: String },
    ReturnedToBranch { branch: String },
    ReturnFailed { branch: String, reason: String },
    AutoSaved { message: String },
    GitBranchDeleted { branch: String },
    GitBranchDeleteFailed { branch: String, reason: String },
}

pub trait Interaction {
    /// The current branch has no record; deploy it anyway?
    fn confirm_untracked_deploy(&mut self, branch: &str) -> Result<bool>;

    /// Pick one of the fully configured environments.
    fn select_environment(&mut self, targets: &[DeployTarget]) -> Result<DeployTarget>;

    fn confirm_production(&mut self, source: &str, target: &DeployTarget) -> Result<bool>;

    /// Production deploy of a feature that has not been on staging.
    fn confirm_out_of_order_promotion(&mut self, feature: &Feature) -> Result<bool>;

    fn choose_conflict_action(&mut self, source: &str, target: &str) -> Result<ConflictAction>;

    /// Block until the operator has resolved and staged the conflicts.
    fn wait_for_conflict_resolution(&mut self, target: &str) -> Result<()>;

    /// Open the deploy page. Failure is reported but never fatal.
    fn open_deploy_page(&mut self, url: &str) -> Result<()>;

    fn confirm_deploy_finished(&mut self, target: &DeployTarget) -> Result<bool>;

    fn confirm_return_to_branch(&mut self, branch: &str) -> Result<bool>;

    fn choose_add_mode(&mut self) -> Result<AddMode>;

    fn input_branch_name(&mut self) -> Result<String>;

    fn input_doc(&mut self) -> Result<String>;

    fn select_existing_branch(&mut self, candidates: &[String]) -> Result<String>;

    /// `branch` is already tracked; replace its record?
    fn confirm_overwrite(&mut self, existing: &Feature) -> Result<bool>;

    /// Pick a tracked feature; returns its branch name.
    fn select_feature(&mut self, purpose: SelectPurpose, features: &[Feature]) -> Result<String>;

    fn confirm_remove(&mut self, feature: &Feature) -> Result<bool>;

    fn confirm_delete_git_branch(&mut self, branch: &str) -> Result<bool>;

    fn select_checkout_target(&mut self, candidates: &[Feature], current: &str) -> Result<String>;

    fn choose_dirty_policy(&mut self) -> Result<DirtyPolicy>;

    /// A configuration exists; replace it?
    fn confirm_replace_config(&mut self, existing: &RepoConfig) -> Result<bool>;

    /// Ask for a configuration, pre-filled from `existing`.
    fn edit_config(&mut self, existing: Option<&RepoConfig>) -> Result<RepoConfig>;

    /// Ask for changes to a record. An empty update means nothing changes.
    fn edit_feature(&mut self, feature: &Feature) -> Result<FeatureUpdate>;

    /// Drop these records whose branches no longer exist?
    fn confirm_prune(&mut self, stale: &[Feature]) -> Result<bool>;

    fn notify(&mut self, notice: Notice);
}
