//! Error types for bm-git

/// Result type for bm-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bm-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not inside a git repository")]
    NotARepository,

    #[error("No 'origin' remote is configured for this repository")]
    NoRemoteConfigured,

    #[error("git {operation} failed: {stderr}")]
    VcsOperationFailed { operation: String, stderr: String },

    #[error("Invalid branch name: {name}")]
    InvalidBranchName { name: String },
}

impl Error {
    pub(crate) fn failed(operation: impl Into<String>, stderr: &str) -> Self {
        Self::VcsOperationFailed {
            operation: operation.into(),
            stderr: stderr.trim().to_string(),
        }
    }
}
