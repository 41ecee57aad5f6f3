//! Fixture builders

use relgraph::{GraphEngine, Vault};
use std::path::Path;
use tempfile::TempDir;

/// A throwaway directory of markdown documents
pub struct TestVault {
    dir: TempDir,
}

impl TestVault {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write `text` to `relative` (e.g. "sub/Note.md"), creating folders.
    pub fn write(&self, relative: &str, text: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, text).expect("write document");
        self
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.dir.path().join(relative)).expect("remove document");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn open(&self) -> Vault {
        Vault::open(self.path()).expect("open vault")
    }
}

/// Engine fully scanned from in-memory documents
pub fn engine_with(docs: &[(&str, &str)]) -> GraphEngine {
    let mut engine = GraphEngine::new();
    engine.full_scan(docs.iter().copied());
    engine
}

/// Empty prior node list for `GraphEngine::model`
pub fn no_prior() -> Vec<String> {
    Vec::new()
}
