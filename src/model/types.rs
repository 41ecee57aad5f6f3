//! Derived graph view types

use crate::grammar::{Direction, Relationship};
use serde::{Deserialize, Serialize};

/// A node of the derived graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Document identifier
    pub id: String,
    /// True when no document with this identifier exists
    pub is_ghost: bool,
}

/// One drawn edge, carrying its offset within a parallel bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeBundle {
    /// Id of the underlying relationship
    pub id: String,
    pub source: String,
    pub target: String,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declaring line, for navigation
    pub line: usize,
    /// Position of this edge among edges sharing the same endpoint pair
    pub ordinal: usize,
    /// `ordinal * CURVE_SPACING`; zero draws a straight edge
    pub curve_offset: f64,
}

impl EdgeBundle {
    pub(crate) fn from_relationship(rel: &Relationship, ordinal: usize, spacing: f64) -> Self {
        Self {
            id: rel.id.clone(),
            source: rel.source_file.clone(),
            target: rel.target_file.clone(),
            direction: rel.direction,
            label: rel.label.clone(),
            line: rel.line,
            ordinal,
            curve_offset: ordinal as f64 * spacing,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Graph derived from the index, the existing documents and a label filter.
///
/// Recomputed on every update; never a second source of truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<EdgeBundle>,
}

impl GraphModel {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeBundle> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Nodes with no backing document
    pub fn ghosts(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.is_ghost)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
