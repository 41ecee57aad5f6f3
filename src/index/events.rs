//! Document lifecycle commands and the changes they produce
//!
//! The host translates its modify/delete/rename notifications into
//! `IndexCommand`s. Each command runs to completion before the next one is
//! applied, so readers never observe a half-applied rename.

use super::store::{RelationshipIndex, RenameOutcome};

/// A document lifecycle event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexCommand {
    /// Document created or its text changed
    Modify { id: String, text: String },
    /// Document deleted
    Delete { id: String },
    /// Document renamed
    Rename { old_id: String, new_id: String },
}

impl IndexCommand {
    pub fn modify(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Modify {
            id: id.into(),
            text: text.into(),
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self::Delete { id: id.into() }
    }

    pub fn rename(old_id: impl Into<String>, new_id: impl Into<String>) -> Self {
        Self::Rename {
            old_id: old_id.into(),
            new_id: new_id.into(),
        }
    }
}

/// What an applied command changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexChange {
    /// Document re-parsed; `relationships` now stored for it
    Reindexed { id: String, relationships: usize },
    /// Document entry dropped (`relationships` = 0 when it was never indexed)
    Removed { id: String, relationships: usize },
    /// Document renamed
    Renamed {
        old_id: String,
        new_id: String,
        moved: usize,
        retargeted: usize,
    },
}

impl RelationshipIndex {
    /// Apply one lifecycle command.
    pub fn apply(&mut self, command: IndexCommand) -> IndexChange {
        match command {
            IndexCommand::Modify { id, text } => {
                let relationships = self.reindex(&id, &text);
                IndexChange::Reindexed { id, relationships }
            }
            IndexCommand::Delete { id } => {
                let relationships = self.remove(&id).map(|r| r.len()).unwrap_or(0);
                IndexChange::Removed { id, relationships }
            }
            IndexCommand::Rename { old_id, new_id } => {
                let RenameOutcome { moved, retargeted } = self.rename(&old_id, &new_id);
                IndexChange::Renamed {
                    old_id,
                    new_id,
                    moved,
                    retargeted,
                }
            }
        }
    }
}
