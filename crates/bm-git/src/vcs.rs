//! Version-control adapter trait

use std::collections::BTreeSet;

use crate::{RepositoryIdentity, Result};

/// Value [`Vcs::current_branch`] returns when HEAD is detached.
pub const DETACHED_HEAD: &str = "HEAD";

/// The only remote the branch manager talks to.
pub const REMOTE: &str = "origin";

/// Typed git operations used by the branch manager.
///
/// Every mutating operation fails with
/// [`Error::VcsOperationFailed`](crate::Error::VcsOperationFailed) carrying
/// the captured stderr when git exits non-zero.
pub trait Vcs {
    /// Whether the working directory is inside a git repository.
    fn is_repository(&self) -> bool;

    /// Name of the checked-out branch, or [`DETACHED_HEAD`].
    fn current_branch(&self) -> Result<String>;

    /// Identity derived from the `origin` remote URL.
    fn repository_identity(&self) -> Result<RepositoryIdentity>;

    fn has_uncommitted_changes(&self) -> Result<bool>;

    fn local_branches(&self) -> Result<BTreeSet<String>>;

    /// Branches of [`REMOTE`], without the remote prefix.
    fn remote_branches(&self) -> Result<BTreeSet<String>>;

    fn has_local_branch(&self, name: &str) -> Result<bool> {
        Ok(self.local_branches()?.contains(name))
    }

    fn has_remote_branch(&self, name: &str) -> Result<bool> {
        Ok(self.remote_branches()?.contains(name))
    }

    /// Reject names git would not accept for a new branch.
    fn check_branch_name(&self, name: &str) -> Result<()>;

    fn checkout(&self, branch: &str) -> Result<()>;

    /// Create `new_branch` at `from` and switch to it.
    fn create_and_checkout(&self, new_branch: &str, from: &str) -> Result<()>;

    fn fetch(&self) -> Result<()>;

    /// Pull `branch` from [`REMOTE`] into the current branch.
    ///
    /// "Already up to date" is a success.
    fn pull(&self, branch: &str) -> Result<()>;

    /// Merge `branch` into the current branch.
    fn merge(&self, branch: &str) -> Result<()>;

    /// Push `branch` (or the current branch) to [`REMOTE`].
    fn push(&self, branch: Option<&str>) -> Result<()>;

    fn abort_merge(&self) -> Result<()>;

    /// Conclude a merge whose conflicts were resolved and staged.
    fn continue_merge(&self) -> Result<()>;

    /// Whether the index holds unresolved conflict entries.
    fn has_merge_conflicts(&self) -> Result<bool>;

    /// Whether a merge is in progress (`MERGE_HEAD` exists).
    fn is_merge_in_progress(&self) -> Result<bool>;

    /// Force-delete a local branch.
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// Stage everything and commit it with `message`.
    fn commit_all(&self, message: &str) -> Result<()>;
}
