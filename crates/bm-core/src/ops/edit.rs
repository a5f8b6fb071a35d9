//! Change a tracked feature's description or status.

use crate::interaction::SelectPurpose;
use crate::model::{Feature, FeatureUpdate};
use crate::session::Session;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    /// Defaults to the current branch when it is tracked; otherwise asks.
    pub branch: Option<String>,
    /// Applied as-is when non-empty; an empty update prompts instead.
    pub update: FeatureUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(Feature),
    Unchanged(Feature),
}

pub fn edit(session: &mut Session<'_>, request: EditRequest) -> Result<EditOutcome> {
    session.require_repository()?;
    let repository = session.identity()?;

    let features = session.store.list_features(&repository).to_vec();
    if features.is_empty() {
        return Err(Error::NothingTracked);
    }

    let branch = match request.branch {
        Some(branch) => branch,
        None => {
            let current = session.vcs.current_branch()?;
            if features.iter().any(|f| f.branch == current) {
                current
            } else {
                session.ui.select_feature(SelectPurpose::Edit, &features)?
            }
        }
    };
    let feature = features
        .into_iter()
        .find(|f| f.branch == branch)
        .ok_or_else(|| Error::FeatureNotFound {
            branch: branch.clone(),
        })?;

    let update = if request.update.is_empty() {
        session.ui.edit_feature(&feature)?
    } else {
        request.update
    };
    if update.is_empty() {
        return Ok(EditOutcome::Unchanged(feature));
    }

    if !session.store.update_feature(&repository, &branch, &update)? {
        return Err(Error::FeatureNotFound { branch });
    }
    let updated = session
        .store
        .get_feature(&repository, &branch)
        .cloned()
        .ok_or(Error::FeatureNotFound { branch })?;
    Ok(EditOutcome::Updated(updated))
}
