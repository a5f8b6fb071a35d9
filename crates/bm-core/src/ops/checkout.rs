//! Switch to another tracked branch.

use chrono::Local;

use crate::interaction::{DirtyPolicy, Notice};
use crate::session::Session;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub branch: Option<String>,
    pub dirty_policy: Option<DirtyPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Switched {
        branch: String,
        /// Message of the commit made to save uncommitted work.
        auto_saved: Option<String>,
    },
    /// No tracked branch other than the current one.
    NoTargets,
    /// Uncommitted changes must be committed by hand first.
    CommitRequired,
    Cancelled,
}

/// Commit message used when uncommitted work is saved automatically.
pub fn auto_save_message() -> String {
    format!(
        "tmp: save changes before switching branches ({})",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn checkout(session: &mut Session<'_>, request: CheckoutRequest) -> Result<CheckoutOutcome> {
    session.require_repository()?;
    let repository = session.identity()?;
    let current = session.vcs.current_branch()?;

    let candidates: Vec<_> = session
        .store
        .list_features(&repository)
        .iter()
        .filter(|f| f.branch != current)
        .cloned()
        .collect();
    if candidates.is_empty() {
        return Ok(CheckoutOutcome::NoTargets);
    }

    let branch = match request.branch {
        Some(branch) => branch,
        None => session.ui.select_checkout_target(&candidates, &current)?,
    };
    if !candidates.iter().any(|f| f.branch == branch) {
        return Err(Error::FeatureNotFound { branch });
    }

    let mut auto_saved = None;
    if session.vcs.has_uncommitted_changes()? {
        let policy = match request.dirty_policy {
            Some(policy) => policy,
            None => session.ui.choose_dirty_policy()?,
        };
        match policy {
            DirtyPolicy::AutoCommit => {
                let message = auto_save_message();
                session.vcs.commit_all(&message)?;
                tracing::info!(branch = %current, message = %message, "uncommitted work saved");
                session.notify(Notice::AutoSaved {
                    message: message.clone(),
                });
                auto_saved = Some(message);
            }
            DirtyPolicy::Manual => return Ok(CheckoutOutcome::CommitRequired),
            DirtyPolicy::Cancel => return Ok(CheckoutOutcome::Cancelled),
        }
    }

    session.vcs.checkout(&branch)?;
    tracing::info!(from = %current, to = %branch, "switched branch");
    Ok(CheckoutOutcome::Switched { branch, auto_saved })
}
