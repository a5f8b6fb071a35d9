//! Error types for bm-core

use crate::model::Env;

/// Errors raised by registry operations and the release flow
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The working tree has uncommitted changes")]
    DirtyWorkingTree,

    #[error("Repository '{repository}' has no environment configuration")]
    NotConfigured { repository: String },

    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    #[error("'{branch}' is an environment branch and cannot be deployed")]
    CannotDeployEnvironmentBranch { branch: String },

    #[error("No environment has both a branch and a deploy URL configured")]
    NoEnvironmentConfigured,

    #[error("The {env} environment is not fully configured")]
    IncompleteEnvironment { env: Env },

    #[error("Branch '{branch}' exists neither locally nor on the remote")]
    TargetBranchMissing { branch: String },

    #[error("Pulling '{branch}' failed: {source}")]
    PullFailed {
        branch: String,
        #[source]
        source: bm_git::Error,
    },

    #[error("Merging '{branch}' into '{target}' failed without conflicts: {source}")]
    UnrecoverableMergeFailure {
        branch: String,
        target: String,
        #[source]
        source: bm_git::Error,
    },

    #[error("Could not conclude the merge: {source}")]
    ContinueMergeFailed {
        #[source]
        source: bm_git::Error,
    },

    #[error("Pushing '{branch}' failed: {source}")]
    PushFailed {
        branch: String,
        #[source]
        source: bm_git::Error,
    },

    #[error("Branch '{branch}' already exists ({})", where_found(.local, .remote))]
    BranchAlreadyExists {
        branch: String,
        local: bool,
        remote: bool,
    },

    #[error("'{branch}' is not a local feature branch")]
    NotACandidate { branch: String },

    #[error("No local feature branches are available")]
    NoCandidateBranches,

    #[error("Cannot remove '{branch}' while it is checked out")]
    CannotRemoveCurrentBranch { branch: String },

    #[error("Branch '{branch}' is not tracked")]
    FeatureNotFound { branch: String },

    #[error("No feature branches are tracked for this repository")]
    NothingTracked,

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Could not record '{branch}': {source}")]
    TrackingFailed {
        branch: String,
        #[source]
        source: bm_fs::Error,
    },

    #[error("Prompt failed: {0}")]
    Interaction(String),

    #[error(transparent)]
    Fs(#[from] bm_fs::Error),

    #[error(transparent)]
    Git(#[from] bm_git::Error),
}

fn where_found(local: &bool, remote: &bool) -> &'static str {
    match (*local, *remote) {
        (true, true) => "locally and on the remote",
        (false, true) => "on the remote",
        _ => "locally",
    }
}

impl Error {
    /// A remediation hint for the operator, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::DirtyWorkingTree => Some("commit or stash your changes first"),
            Self::NotConfigured { .. } | Self::NoEnvironmentConfigured => {
                Some("run `bm set` to configure environment branches and deploy URLs")
            }
            Self::IncompleteEnvironment { .. } => {
                Some("run `bm set` and give the environment both a branch and a URL")
            }
            Self::CannotDeployEnvironmentBranch { .. } | Self::DetachedHead => {
                Some("switch to a feature branch first")
            }
            Self::CannotRemoveCurrentBranch { .. } => Some("switch to another branch first"),
            Self::BranchAlreadyExists { .. } => {
                Some("use `bm add --existing` to track a branch that already exists")
            }
            Self::PushFailed { .. } => {
                Some("the merge is committed locally; pull and push the target branch by hand")
            }
            Self::ContinueMergeFailed { .. } | Self::UnrecoverableMergeFailure { .. } => {
                Some("inspect the target branch with `git status` before retrying")
            }
            Self::TrackingFailed { .. } | Self::Fs(_) => {
                Some("check file permissions and free disk space")
            }
            Self::Git(bm_git::Error::NotARepository) => Some("run bm inside a git work tree"),
            Self::Git(bm_git::Error::Spawn { .. }) => Some("make sure git is installed and on PATH"),
            Self::Git(bm_git::Error::NoRemoteConfigured) => {
                Some("add an `origin` remote; repositories are keyed by its URL")
            }
            _ => None,
        }
    }
}

/// Result type for bm-core operations
pub type Result<T> = std::result::Result<T, Error>;
