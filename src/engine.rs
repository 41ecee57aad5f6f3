//! GraphEngine: the main entry point tying index, existence and settings

use crate::config::Settings;
use crate::grammar::{normalize_identifier, DescriptorParser};
use crate::index::{IndexChange, IndexCommand, RelationshipIndex};
use crate::model::{build, GraphModel};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The main relgraph engine
///
/// Owns the relationship index and tracks which documents exist, so the
/// graph model can be rebuilt after every lifecycle event. Mutations run one
/// at a time through `&mut self`; readers see only settled state.
#[derive(Debug, Clone, Default)]
pub struct GraphEngine {
    index: RelationshipIndex,
    existing: BTreeSet<String>,
    settings: Settings,
}

impl GraphEngine {
    /// Create an engine with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given settings
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            index: RelationshipIndex::with_parser(DescriptorParser::new(settings.syntax)),
            existing: BTreeSet::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings.
    ///
    /// A syntax change only affects documents parsed afterwards; call
    /// `full_scan` to re-parse everything.
    pub fn set_settings(&mut self, settings: Settings) {
        if settings.syntax != self.index.parser().syntax() {
            debug!(syntax = ?settings.syntax, "parser syntax changed");
            self.index.set_parser(DescriptorParser::new(settings.syntax));
        }
        self.settings = settings;
    }

    pub fn index(&self) -> &RelationshipIndex {
        &self.index
    }

    /// Replace all state from the given documents
    pub fn full_scan<I, S, T>(&mut self, documents: I)
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let documents: Vec<(S, T)> = documents.into_iter().collect();
        self.existing = documents
            .iter()
            .map(|(id, _)| normalize_identifier(id.as_ref()))
            .collect();
        self.index.full_scan(documents);
        info!(existing = self.existing.len(), "engine rescanned");
    }

    /// Apply a document lifecycle event
    pub fn apply(&mut self, command: IndexCommand) -> IndexChange {
        match &command {
            IndexCommand::Modify { id, .. } => {
                self.existing.insert(normalize_identifier(id));
            }
            IndexCommand::Delete { id } => {
                self.existing.remove(&normalize_identifier(id));
            }
            IndexCommand::Rename { old_id, new_id } => {
                self.existing.remove(&normalize_identifier(old_id));
                self.existing.insert(normalize_identifier(new_id));
            }
        }
        self.index.apply(command)
    }

    /// Whether a document with this identifier exists
    pub fn exists(&self, id: &str) -> bool {
        self.existing.contains(&normalize_identifier(id))
    }

    pub fn existing_identifiers(&self) -> &BTreeSet<String> {
        &self.existing
    }

    /// Build the graph model, keeping `prior_nodes` (e.g. from the current
    /// layout) in the node set.
    pub fn model<N>(&self, prior_nodes: N) -> GraphModel
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        build(
            prior_nodes,
            self.index.all_relationships(),
            &self.existing,
            &self.settings.label_filter(),
        )
    }
}
