//! Record the environment branches and deploy URLs of a repository.

use crate::model::RepoConfig;
use crate::session::Session;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct ConfigureRequest {
    /// Use this configuration instead of prompting for one.
    pub config: Option<RepoConfig>,
    /// Replace an existing configuration without asking.
    pub assume_yes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    Saved(RepoConfig),
    Cancelled,
}

pub fn configure(session: &mut Session<'_>, request: ConfigureRequest) -> Result<ConfigureOutcome> {
    session.require_repository()?;
    let repository = session.identity()?;
    let existing = session.store.get_config(&repository).cloned();

    if let Some(existing) = &existing {
        if !request.assume_yes && !session.ui.confirm_replace_config(existing)? {
            return Ok(ConfigureOutcome::Cancelled);
        }
    }

    let config = match request.config {
        Some(config) => config,
        None => session.ui.edit_config(existing.as_ref())?,
    };
    config
        .validate()
        .map_err(|message| Error::InvalidConfig { message })?;

    session.store.set_config(&repository, config.clone())?;
    Ok(ConfigureOutcome::Saved(config))
}
