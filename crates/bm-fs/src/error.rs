//! Error types for bm-fs

use std::path::PathBuf;

/// Result type for bm-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bm-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON document at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize JSON document for {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    #[error("Could not determine the home directory; set BM_HOME to choose a store location")]
    NoHomeDirectory,

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path of the document involved, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::Serialize { path, .. }
            | Self::LockFailed { path } => Some(path),
            Self::NoHomeDirectory => None,
        }
    }
}
