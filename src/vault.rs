//! Directory-backed document source
//!
//! Stands in for the host application: discovers `.md` documents under a
//! root directory and reports which identifiers exist.

use crate::grammar::normalize_identifier;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Errors raised while reading a vault
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Vault root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// A document read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Normalized identifier (file stem)
    pub id: String,
    /// Path relative to the vault root
    pub path: PathBuf,
    pub text: String,
}

/// A directory of markdown documents
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    documents: Vec<Document>,
}

impl Vault {
    /// Read every `.md` file below `root`, skipping hidden directories.
    pub fn open(root: impl AsRef<Path>) -> VaultResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(VaultError::RootNotFound(root));
        }

        let mut documents = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            let path = entry.path();
            let text = std::fs::read_to_string(path).map_err(|source| VaultError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let relative = path.strip_prefix(&root).unwrap_or(path).to_path_buf();
            let id = normalize_identifier(&relative.to_string_lossy());
            if documents.iter().any(|d: &Document| d.id == id) {
                warn!(id = %id, path = %relative.display(), "duplicate document name, later file ignored");
                continue;
            }
            documents.push(Document {
                id,
                path: relative,
                text,
            });
        }

        debug!(root = %root.display(), documents = documents.len(), "opened vault");
        Ok(Self { root, documents })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// `(id, text)` pairs suitable for a full scan
    pub fn contents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .map(|d| (d.id.as_str(), d.text.as_str()))
    }

    /// Identifiers of every document in the vault
    pub fn existing_identifiers(&self) -> BTreeSet<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}
