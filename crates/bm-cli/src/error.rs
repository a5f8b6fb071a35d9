//! Error types for bm-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from bm-core
    #[error(transparent)]
    Core(#[from] bm_core::Error),

    /// Error from bm-fs
    #[error(transparent)]
    Fs(#[from] bm_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// What the operator can do about it, if anything.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Core(e) => e.hint(),
            Self::Fs(_) => Some("check file permissions and free disk space"),
            Self::Dialoguer(_) => Some("pass the values as flags when not running in a terminal"),
            _ => None,
        }
    }
}
