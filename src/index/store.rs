//! RelationshipIndex: per-document relationship store

use crate::grammar::{normalize_identifier, DescriptorParser, Relationship};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Outcome of a rename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenameOutcome {
    /// Relationships owned by the renamed document
    pub moved: usize,
    /// Relationships elsewhere whose target was rewritten
    pub retargeted: usize,
}

/// Incremental store of relationships keyed by declaring document.
///
/// The key set is exactly the documents parsed and not since removed.
/// Re-parsing a document replaces its list wholesale. Aggregate queries are
/// computed from the entries on every call; there is no derived cache.
#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    entries: BTreeMap<String, Vec<Relationship>>,
    parser: DescriptorParser,
}

impl RelationshipIndex {
    /// Create an empty index using the canonical syntax
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with a specific parser
    pub fn with_parser(parser: DescriptorParser) -> Self {
        Self {
            entries: BTreeMap::new(),
            parser,
        }
    }

    pub fn parser(&self) -> DescriptorParser {
        self.parser
    }

    /// Swap the parser. Stored entries are untouched until re-parsed.
    pub fn set_parser(&mut self, parser: DescriptorParser) {
        self.parser = parser;
    }

    /// Re-parse `text` and replace the entry for `source_id`.
    ///
    /// Returns the number of relationships now stored for the document.
    pub fn reindex(&mut self, source_id: &str, text: &str) -> usize {
        let source = normalize_identifier(source_id);
        let relationships = self.parser.parse(text, &source);
        let count = relationships.len();
        debug!(source = %source, count, "reindexed document");
        self.entries.insert(source, relationships);
        count
    }

    /// Remove a document's entry.
    ///
    /// Relationships in other documents that target it are left alone; they
    /// now point at a ghost.
    pub fn remove(&mut self, source_id: &str) -> Option<Vec<Relationship>> {
        let source = normalize_identifier(source_id);
        let removed = self.entries.remove(&source);
        if let Some(rels) = &removed {
            debug!(source = %source, count = rels.len(), "removed document");
        }
        removed
    }

    /// Rename a document.
    ///
    /// Moves its entry to the new key (rewriting `source_file` and ids) and
    /// rewrites every relationship targeting the old name, in all entries.
    pub fn rename(&mut self, old_id: &str, new_id: &str) -> RenameOutcome {
        let old = normalize_identifier(old_id);
        let new = normalize_identifier(new_id);
        let mut outcome = RenameOutcome::default();
        if old == new {
            return outcome;
        }

        if let Some(mut owned) = self.entries.remove(&old) {
            for rel in &mut owned {
                rel.reassign_source(&new);
            }
            outcome.moved = owned.len();
            if let Some(replaced) = self.entries.insert(new.clone(), owned) {
                warn!(
                    target_id = %new,
                    dropped = replaced.len(),
                    "rename replaced an existing entry"
                );
            }
        }

        for rel in self.entries.values_mut().flatten() {
            if rel.target_file == old {
                rel.target_file = new.clone();
                outcome.retargeted += 1;
            }
        }

        info!(
            from = %old,
            to = %new,
            moved = outcome.moved,
            retargeted = outcome.retargeted,
            "renamed document"
        );
        outcome
    }

    /// Clear everything and reindex every document.
    pub fn full_scan<I, S, T>(&mut self, documents: I)
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        self.entries.clear();
        for (id, text) in documents {
            self.reindex(id.as_ref(), text.as_ref());
        }
        info!(
            documents = self.entries.len(),
            relationships = self.len(),
            "full scan complete"
        );
    }

    /// Every stored relationship, grouped by document in key order
    pub fn all_relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.values().flatten()
    }

    /// Relationships declared in one document
    pub fn relationships_for(&self, source_id: &str) -> &[Relationship] {
        self.entries
            .get(&normalize_identifier(source_id))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Relationships in any document that target `target_id`
    pub fn relationships_targeting<'a>(
        &'a self,
        target_id: &str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        let target = normalize_identifier(target_id);
        self.all_relationships()
            .filter(move |r| r.target_file == target)
    }

    /// Union of every source and target identifier
    pub fn all_node_identifiers(&self) -> BTreeSet<String> {
        self.all_relationships()
            .flat_map(|r| [r.source_file.clone(), r.target_file.clone()])
            .collect()
    }

    /// Documents currently indexed
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn contains_source(&self, source_id: &str) -> bool {
        self.entries.contains_key(&normalize_identifier(source_id))
    }

    pub fn source_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of stored relationships
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
