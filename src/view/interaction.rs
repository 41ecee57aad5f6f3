//! Node and edge activation

use crate::model::GraphModel;
use serde::Serialize;

/// What activating a node asks the host to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum NodeActivation {
    /// Open the existing document
    Open { id: String },
    /// Offer to create the missing document
    Create { id: String },
}

impl NodeActivation {
    pub fn id(&self) -> &str {
        match self {
            Self::Open { id } | Self::Create { id } => id,
        }
    }
}

/// Navigate to the declaring document at a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeActivation {
    pub source: String,
    pub line: usize,
}

/// Resolve a click on a node. `None` for identifiers not in the model.
pub fn activate_node(model: &GraphModel, id: &str) -> Option<NodeActivation> {
    let node = model.node(id)?;
    let id = node.id.clone();
    Some(if node.is_ghost {
        NodeActivation::Create { id }
    } else {
        NodeActivation::Open { id }
    })
}

/// Resolve a click on an edge
pub fn activate_edge(model: &GraphModel, edge_id: &str) -> Option<EdgeActivation> {
    model.edge(edge_id).map(|edge| EdgeActivation {
        source: edge.source.clone(),
        line: edge.line,
    })
}
