//! Where registry documents live.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use bm_fs::{JsonDocument, StoreFile, StoreLayout};

use super::{ConfigDocument, StateDocument};

/// Loads and saves the two registry documents as whole values.
pub trait Persistence {
    fn load_config(&self) -> bm_fs::Result<ConfigDocument>;
    fn save_config(&self, doc: &ConfigDocument) -> bm_fs::Result<()>;
    fn load_state(&self) -> bm_fs::Result<StateDocument>;
    fn save_state(&self, doc: &StateDocument) -> bm_fs::Result<()>;
}

/// `config.json` and `state.json` under a [`StoreLayout`].
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    config: JsonDocument,
    state: JsonDocument,
}

impl JsonFileBackend {
    pub fn new(layout: &StoreLayout) -> bm_fs::Result<Self> {
        layout.ensure()?;
        Ok(Self {
            config: layout.document(StoreFile::Config),
            state: layout.document(StoreFile::State),
        })
    }
}

impl Persistence for JsonFileBackend {
    fn load_config(&self) -> bm_fs::Result<ConfigDocument> {
        self.config.load_or_init()
    }

    fn save_config(&self, doc: &ConfigDocument) -> bm_fs::Result<()> {
        self.config.save(doc)
    }

    fn load_state(&self) -> bm_fs::Result<StateDocument> {
        self.state.load_or_init()
    }

    fn save_state(&self, doc: &StateDocument) -> bm_fs::Result<()> {
        self.state.save(doc)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    config: ConfigDocument,
    state: StateDocument,
    fail_writes: bool,
    writes: usize,
}

/// In-memory persistence. Clones share the same documents, so a handle kept
/// outside the store can inspect writes or make them fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Number of successful saves so far.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    pub fn config(&self) -> ConfigDocument {
        self.inner.borrow().config.clone()
    }

    pub fn state(&self) -> StateDocument {
        self.inner.borrow().state.clone()
    }

    fn check_writable(&self, what: &str) -> bm_fs::Result<()> {
        if self.inner.borrow().fail_writes {
            return Err(bm_fs::Error::io(
                PathBuf::from(format!("<memory>/{what}")),
                std::io::Error::other("writes disabled"),
            ));
        }
        Ok(())
    }
}

impl Persistence for MemoryBackend {
    fn load_config(&self) -> bm_fs::Result<ConfigDocument> {
        Ok(self.config())
    }

    fn save_config(&self, doc: &ConfigDocument) -> bm_fs::Result<()> {
        self.check_writable("config.json")?;
        let mut inner = self.inner.borrow_mut();
        inner.config = doc.clone();
        inner.writes += 1;
        Ok(())
    }

    fn load_state(&self) -> bm_fs::Result<StateDocument> {
        Ok(self.state())
    }

    fn save_state(&self, doc: &StateDocument) -> bm_fs::Result<()> {
        self.check_writable("state.json")?;
        let mut inner = self.inner.borrow_mut();
        inner.state = doc.clone();
        inner.writes += 1;
        Ok(())
    }
}
