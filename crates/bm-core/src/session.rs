//! Everything an operation needs: the store, the repository, the operator.

use bm_git::{DETACHED_HEAD, Vcs};

use crate::interaction::{Interaction, Notice};
use crate::model::RepoConfig;
use crate::store::RegistryStore;
use crate::{Error, Result};

pub struct Session<'a> {
    pub store: &'a mut RegistryStore,
    pub vcs: &'a dyn Vcs,
    pub ui: &'a mut dyn Interaction,
}

impl<'a> Session<'a> {
    pub fn new(
        store: &'a mut RegistryStore,
        vcs: &'a dyn Vcs,
        ui: &'a mut dyn Interaction,
    ) -> Self {
        Self { store, vcs, ui }
    }

    pub(crate) fn require_repository(&self) -> Result<()> {
        if self.vcs.is_repository() {
            Ok(())
        } else {
            Err(bm_git::Error::NotARepository.into())
        }
    }

    pub(crate) fn require_clean_tree(&self) -> Result<()> {
        if self.vcs.has_uncommitted_changes()? {
            return Err(Error::DirtyWorkingTree);
        }
        Ok(())
    }

    pub(crate) fn identity(&self) -> Result<String> {
        Ok(self.vcs.repository_identity()?.as_str().to_string())
    }

    /// The checked-out branch; a detached HEAD is an error.
    pub(crate) fn current_branch(&self) -> Result<String> {
        let branch = self.vcs.current_branch()?;
        if branch == DETACHED_HEAD {
            return Err(Error::DetachedHead);
        }
        Ok(branch)
    }

    pub(crate) fn require_config(&self, repository: &str) -> Result<RepoConfig> {
        self.store
            .get_config(repository)
            .cloned()
            .ok_or_else(|| Error::NotConfigured {
                repository: repository.to_string(),
            })
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        tracing::debug!(?notice, "progress");
        self.ui.notify(notice);
    }
}
