//! Stop tracking a feature branch, optionally deleting it from git.

use crate::interaction::{Notice, SelectPurpose};
use crate::model::Feature;
use crate::session::Session;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct RemoveRequest {
    pub branch: Option<String>,
    /// Also force-delete the local git branch (`None` asks).
    pub delete_git_branch: Option<bool>,
    /// Skip the removal confirmation.
    pub assume_yes: bool,
}

/// What happened to the local git branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitBranchRemoval {
    Kept,
    Deleted,
    /// There was no local branch to delete.
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed {
        feature: Feature,
        git_branch: GitBranchRemoval,
    },
    Cancelled,
}

pub fn remove(session: &mut Session<'_>, request: RemoveRequest) -> Result<RemoveOutcome> {
    session.require_repository()?;
    let repository = session.identity()?;

    let features = session.store.list_features(&repository).to_vec();
    if features.is_empty() {
        return Err(Error::NothingTracked);
    }

    let branch = match request.branch {
        Some(branch) => branch,
        None => session.ui.select_feature(SelectPurpose::Remove, &features)?,
    };
    let feature = features
        .into_iter()
        .find(|f| f.branch == branch)
        .ok_or_else(|| Error::FeatureNotFound {
            branch: branch.clone(),
        })?;

    if session.vcs.current_branch()? == branch {
        return Err(Error::CannotRemoveCurrentBranch { branch });
    }

    if !request.assume_yes && !session.ui.confirm_remove(&feature)? {
        return Ok(RemoveOutcome::Cancelled);
    }
    let delete = match request.delete_git_branch {
        Some(delete) => delete,
        None => session.ui.confirm_delete_git_branch(&branch)?,
    };

    let git_branch = if delete {
        delete_local_branch(session, &branch)?
    } else {
        GitBranchRemoval::Kept
    };

    // The record goes regardless of what happened to the git branch.
    if !session.store.remove_feature(&repository, &branch)? {
        return Err(Error::FeatureNotFound { branch });
    }
    Ok(RemoveOutcome::Removed {
        feature,
        git_branch,
    })
}

fn delete_local_branch(session: &mut Session<'_>, branch: &str) -> Result<GitBranchRemoval> {
    if !session.vcs.has_local_branch(branch)? {
        return Ok(GitBranchRemoval::Missing);
    }
    match session.vcs.delete_branch(branch) {
        Ok(()) => {
            tracing::info!(branch, "local branch deleted");
            session.notify(Notice::GitBranchDeleted {
                branch: branch.to_string(),
            });
            Ok(GitBranchRemoval::Deleted)
        }
        Err(e) => {
            tracing::warn!(branch, error = %e, "could not delete local branch");
            session.notify(Notice::GitBranchDeleteFailed {
                branch: branch.to_string(),
                reason: e.to_string(),
            });
            Ok(GitBranchRemoval::Failed(e.to_string()))
        }
    }
}
