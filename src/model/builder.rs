//! Builds the graph model from indexed relationships

use super::types::{EdgeBundle, GraphModel, GraphNode};
use crate::grammar::Relationship;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Spacing between parallel edges of one endpoint pair
pub const CURVE_SPACING: f64 = 30.0;

/// Answers whether a document with a given identifier exists.
///
/// Supplied by the host; identifiers missing here become ghost nodes.
pub trait ExistingDocuments {
    fn exists(&self, id: &str) -> bool;
}

impl ExistingDocuments for HashSet<String> {
    fn exists(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl ExistingDocuments for BTreeSet<String> {
    fn exists(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl<F> ExistingDocuments for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, id: &str) -> bool {
        self(id)
    }
}

/// Case-insensitive substring filter on relationship labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelFilter {
    needle: Option<String>,
}

impl LabelFilter {
    /// Create a filter; blank text disables filtering
    pub fn new(text: &str) -> Self {
        let text = text.trim();
        Self {
            needle: (!text.is_empty()).then(|| text.to_lowercase()),
        }
    }

    /// A filter that keeps everything
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    /// Unlabeled relationships never match an active filter.
    pub fn matches(&self, rel: &Relationship) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => rel
                .label
                .as_ref()
                .is_some_and(|label| label.to_lowercase().contains(needle)),
        }
    }
}

impl From<&str> for LabelFilter {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Build the derived graph.
///
/// Nodes are the pre-known identifiers followed by every endpoint of the
/// relationships passing `filter`, deduplicated, in first-seen order.
/// Relationships sharing an unordered endpoint pair get consecutive
/// ordinals in relationship order.
pub fn build<'a, N, R, E>(
    node_identifiers: N,
    relationships: R,
    existing: &E,
    filter: &LabelFilter,
) -> GraphModel
where
    N: IntoIterator,
    N::Item: AsRef<str>,
    R: IntoIterator<Item = &'a Relationship>,
    E: ExistingDocuments + ?Sized,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut nodes = Vec::new();
    let mut push_node = |id: &str, nodes: &mut Vec<GraphNode>| {
        if seen.insert(id.to_string()) {
            nodes.push(GraphNode {
                id: id.to_string(),
                is_ghost: !existing.exists(id),
            });
        }
    };

    for id in node_identifiers {
        push_node(id.as_ref(), &mut nodes);
    }

    let mut pair_counts: HashMap<(String, String), usize> = HashMap::new();
    let mut edges = Vec::new();
    for rel in relationships.into_iter().filter(|r| filter.matches(r)) {
        push_node(&rel.source_file, &mut nodes);
        push_node(&rel.target_file, &mut nodes);

        let counter = pair_counts.entry(pair_key(rel)).or_insert(0);
        edges.push(EdgeBundle::from_relationship(rel, *counter, CURVE_SPACING));
        *counter += 1;
    }

    GraphModel { nodes, edges }
}

/// Endpoints sorted so that A→B and B→A share a key
fn pair_key(rel: &Relationship) -> (String, String) {
    let (a, b) = (&rel.source_file, &rel.target_file);
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}
