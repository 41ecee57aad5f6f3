//! Rendering contract: positioned snapshot and click handling

mod interaction;
mod snapshot;

pub use interaction::{activate_edge, activate_node, EdgeActivation, NodeActivation};
pub use snapshot::{arrow_ends, GraphView, ViewEdge, ViewNode};
