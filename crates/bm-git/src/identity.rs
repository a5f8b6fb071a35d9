//! Repository identity derived from the `origin` remote URL.

use std::fmt;

/// Normalized key identifying a repository across clones.
///
/// `https://host/group/proj.git` and `git@host:group/proj.git` both map to
/// `host/group/proj`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryIdentity(String);

impl RepositoryIdentity {
    /// Wrap an already-normalized key, e.g. one read back from the store.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive the identity from a remote URL.
    ///
    /// Strips a trailing `.git`, any `scheme://` prefix and a `git@` user,
    /// then turns the first `:` into `/`.
    pub fn from_remote_url(url: &str) -> Self {
        let mut key = url.trim().trim_end_matches('/');

        if let Some(stripped) = key.strip_suffix(".git") {
            key = stripped;
        }
        if let Some(idx) = key.find("://") {
            key = &key[idx + 3..];
        }
        if let Some(stripped) = key.strip_prefix("git@") {
            key = stripped;
        }

        Self(key.replacen(':', "/", 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepositoryIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
