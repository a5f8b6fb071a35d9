//! Per-user store layout.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, JsonDocument, Result};

/// Name of the store directory under the user's home.
pub const STORE_DIR_NAME: &str = ".bm";

/// Files kept in the store directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFile {
    /// Per-repository environment configuration
    Config,
    /// Per-repository tracked feature branches
    State,
}

impl StoreFile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config.json",
            Self::State => "state.json",
        }
    }
}

impl AsRef<Path> for StoreFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl fmt::Display for StoreFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of the store on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the store directory: the explicit override when given,
    /// otherwise `~/.bm`.
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        match override_dir {
            Some(dir) => Ok(Self::new(dir)),
            None => {
                let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
                Ok(Self::new(home.join(STORE_DIR_NAME)))
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if needed.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))
    }

    pub fn file(&self, file: StoreFile) -> PathBuf {
        self.root.join(file)
    }

    pub fn document(&self, file: StoreFile) -> JsonDocument {
        JsonDocument::new(self.file(file))
    }
}
