//! Relationship facts extracted from documents

use serde::{Deserialize, Serialize};

/// Extension stripped from document identifiers
const DOCUMENT_EXTENSION: &str = ".md";

/// Direction of a declared relationship, relative to the declaring document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Arrow points out of the source (`-+`, `label+`)
    Outgoing,
    /// Arrow points into the source (`+-`, `+label`)
    Incoming,
    /// No arrow, labeled (`label`)
    Undirected,
    /// Arrows at both ends (`++`, `+label+`)
    Bidirectional,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outgoing => "outgoing",
            Direction::Incoming => "incoming",
            Direction::Undirected => "undirected",
            Direction::Bidirectional => "bidirectional",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a document identifier.
///
/// Trims whitespace, keeps only the basename and strips a trailing `.md`.
/// `folder/Note.md` and `Note` both normalize to `Note`.
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = trimmed
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(trimmed);
    let stem = match base.len().checked_sub(DOCUMENT_EXTENSION.len()) {
        Some(cut)
            if base.is_char_boundary(cut)
                && base[cut..].eq_ignore_ascii_case(DOCUMENT_EXTENSION) =>
        {
            &base[..cut]
        }
        _ => base,
    };
    stem.trim().to_string()
}

/// Build the stable id of a relationship from its declaring position.
pub fn relationship_id(source: &str, line: usize, occurrence: usize) -> String {
    format!("{}:{}:{}", source, line, occurrence)
}

/// A single relationship declared in a source document.
///
/// Owned by the index entry of `source_file`. The id encodes where the
/// declaration sits (source, line, occurrence), never the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// `source:line:occurrence`
    pub id: String,
    /// Declaring document
    pub source_file: String,
    /// Referenced document (may not exist)
    pub target_file: String,
    pub direction: Direction,
    /// Free text label, never empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// 1-indexed line of the declaration
    pub line: usize,
    /// Ordinal of the match within its parse
    pub occurrence: usize,
}

impl Relationship {
    /// Create a relationship, deriving its id and normalizing the label.
    pub fn new(
        source_file: impl Into<String>,
        target_file: impl Into<String>,
        direction: Direction,
        label: Option<String>,
        line: usize,
        occurrence: usize,
    ) -> Self {
        let source_file = source_file.into();
        let label = label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Self {
            id: relationship_id(&source_file, line, occurrence),
            source_file,
            target_file: target_file.into(),
            direction,
            label,
            line,
            occurrence,
        }
    }

    /// Move this relationship to a new declaring document, recomputing its id.
    pub(crate) fn reassign_source(&mut self, source: &str) {
        self.source_file = source.to_string();
        self.id = relationship_id(source, self.line, self.occurrence);
    }

    /// True when the relationship points back at its own source.
    pub fn is_self_reference(&self) -> bool {
        self.source_file == self.target_file
    }
}
