//! Start tracking a feature branch.

use crate::interaction::{AddMode, Notice};
use crate::model::{Feature, now};
use crate::session::Session;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct AddRequest {
    pub mode: Option<AddMode>,
    pub branch: Option<String>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new branch was cut from the production branch.
    Created(Feature),
    /// An existing local branch is now tracked.
    Attached(Feature),
    /// The operator kept an existing record.
    Cancelled,
}

pub fn add(session: &mut Session<'_>, request: AddRequest) -> Result<AddOutcome> {
    session.require_repository()?;
    session.require_clean_tree()?;
    let repository = session.identity()?;
    let config = session.require_config(&repository)?;

    let mode = match request.mode {
        Some(mode) => mode,
        None => session.ui.choose_add_mode()?,
    };
    match mode {
        AddMode::Create => create(session, &repository, &config.branches.prod, request),
        AddMode::Existing => attach(session, &repository, &config, request),
    }
}

fn create(
    session: &mut Session<'_>,
    repository: &str,
    base: &str,
    request: AddRequest,
) -> Result<AddOutcome> {
    let vcs = session.vcs;
    let branch = match request.branch {
        Some(branch) => branch,
        None => session.ui.input_branch_name()?,
    };
    let branch = branch.trim().to_string();
    vcs.check_branch_name(&branch)?;

    vcs.fetch()?;
    let local = vcs.has_local_branch(&branch)?;
    let remote = vcs.has_remote_branch(&branch)?;
    if local || remote {
        return Err(Error::BranchAlreadyExists {
            branch,
            local,
            remote,
        });
    }

    let doc = match request.doc {
        Some(doc) => doc,
        None => session.ui.input_doc()?,
    };
    if !confirm_replacing(session, repository, &branch)? {
        return Ok(AddOutcome::Cancelled);
    }

    session.notify(Notice::Syncing {
        branch: base.to_string(),
    });
    if vcs.has_local_branch(base)? {
        vcs.checkout(base)?;
    } else if vcs.has_remote_branch(base)? {
        vcs.create_and_checkout(base, &format!("{}/{}", bm_git::REMOTE, base))?;
        session.notify(Notice::TrackingRemoteBranch {
            branch: base.to_string(),
        });
    } else {
        return Err(Error::TargetBranchMissing {
            branch: base.to_string(),
        });
    }
    // A stale base is acceptable; the branch can be rebased later.
    if let Err(e) = vcs.pull(base) {
        tracing::warn!(branch = base, error = %e, "pull of base branch failed");
        session.notify(Notice::PullSkipped {
            branch: base.to_string(),
            reason: e.to_string(),
        });
    }

    session.notify(Notice::CreatingBranch {
        branch: branch.clone(),
        base: base.to_string(),
    });
    vcs.create_and_checkout(&branch, base)?;

    let feature = Feature::new(&branch, doc, base, now());
    track(session, repository, feature.clone())?;
    Ok(AddOutcome::Created(feature))
}

fn attach(
    session: &mut Session<'_>,
    repository: &str,
    config: &crate::model::RepoConfig,
    request: AddRequest,
) -> Result<AddOutcome> {
    let vcs = session.vcs;
    let candidates: Vec<String> = vcs
        .local_branches()?
        .into_iter()
        .filter(|b| !config.is_env_branch(b))
        .collect();
    if candidates.is_empty() {
        return Err(Error::NoCandidateBranches);
    }

    let branch = match request.branch {
        Some(branch) => branch.trim().to_string(),
        None => session.ui.select_existing_branch(&candidates)?,
    };
    if !candidates.contains(&branch) {
        return Err(Error::NotACandidate { branch });
    }

    let doc = match request.doc {
        Some(doc) => doc,
        None => session.ui.input_doc()?,
    };
    if !confirm_replacing(session, repository, &branch)? {
        return Ok(AddOutcome::Cancelled);
    }

    if vcs.current_branch()? != branch {
        vcs.checkout(&branch)?;
    }

    let feature = Feature::new(&branch, doc, &config.branches.prod, now());
    track(session, repository, feature.clone())?;
    Ok(AddOutcome::Attached(feature))
}

/// `true` when there is no record for `branch` or the operator agrees to
/// replace it.
fn confirm_replacing(session: &mut Session<'_>, repository: &str, branch: &str) -> Result<bool> {
    match session.store.get_feature(repository, branch).cloned() {
        Some(existing) => session.ui.confirm_overwrite(&existing),
        None => Ok(true),
    }
}

fn track(session: &mut Session<'_>, repository: &str, feature: Feature) -> Result<()> {
    let branch = feature.branch.clone();
    session
        .store
        .upsert_feature(repository, feature)
        .map_err(|e| match e {
            Error::Fs(source) => Error::TrackingFailed { branch, source },
            other => other,
        })
}
