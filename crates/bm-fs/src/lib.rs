//! Filesystem layer for the branch manager
//!
//! Provides the per-user store layout and durable, pretty-printed JSON
//! documents written with a write-to-temp-then-rename strategy.

pub mod document;
pub mod error;
pub mod io;
pub mod layout;

pub use document::JsonDocument;
pub use error::{Error, Result};
pub use layout::{StoreFile, StoreLayout};
