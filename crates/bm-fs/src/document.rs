//! Pretty-printed JSON documents

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// A JSON document on disk.
///
/// The whole document is read into memory on load and rewritten in full on
/// every save; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and parse the document.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T> {
        let content = io::read_text(&self.path)?;
        self.parse(&content)
    }

    /// Load the document, creating it from `T::default()` when it is missing.
    ///
    /// An empty file is treated like a missing one.
    pub fn load_or_init<T>(&self) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        match io::read_text_if_exists(&self.path)? {
            Some(content) if !content.trim().is_empty() => self.parse(&content),
            _ => {
                let value = T::default();
                self.save(&value)?;
                tracing::debug!(path = %self.path.display(), "initialised empty document");
                Ok(value)
            }
        }
    }

    /// Serialize with two-space indentation and write atomically.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(value).map_err(|e| Error::Serialize {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        content.push('\n');
        io::write_text(&self.path, &content)
    }

    fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_json::from_str(content).map_err(|e| Error::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}
