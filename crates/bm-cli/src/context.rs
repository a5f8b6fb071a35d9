//! Where bm runs: the working directory and the store location.

use std::path::{Path, PathBuf};

use bm_core::RegistryStore;
use bm_fs::StoreLayout;
use bm_git::GitCli;

use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct AppContext {
    cwd: PathBuf,
    layout: StoreLayout,
}

impl AppContext {
    /// Resolve the working directory (`-C`) and store directory (`--home`,
    /// `BM_HOME`, then `~/.bm`).
    pub fn resolve(directory: Option<PathBuf>, home: Option<PathBuf>) -> Result<Self> {
        let cwd = match directory {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        if !cwd.is_dir() {
            return Err(CliError::user(format!(
                "{} is not a directory",
                cwd.display()
            )));
        }
        let layout = StoreLayout::resolve(home)?;
        tracing::debug!(cwd = %cwd.display(), store = %layout.root().display(), "context resolved");
        Ok(Self { cwd, layout })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn open_store(&self) -> Result<RegistryStore> {
        Ok(RegistryStore::open_dir(self.layout())?)
    }

    pub fn vcs(&self) -> GitCli {
        GitCli::open(self.cwd())
    }
}
