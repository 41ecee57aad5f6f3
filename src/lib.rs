//! Relgraph: typed relationships between markdown documents
//!
//! Documents declare directed, labeled relationships inline with
//! `<<descriptor>>[[Target]]`. Relgraph parses those declarations, keeps a
//! per-document index in step with edits, derives a graph with ghost nodes
//! for missing documents, and lays it out with a force simulation that keeps
//! node positions stable across rebuilds.
//!
//! # Core Concepts
//!
//! - **Relationships**: parsed facts owned by the declaring document
//! - **Index**: per-document relationship lists, mutated by lifecycle events
//! - **Graph model**: nodes and bundled edges, rebuilt on every change
//! - **Layout**: a simulation whose body state is keyed by node identifier
//!
//! # Example
//!
//! ```
//! use relgraph::{GraphEngine, IndexCommand};
//!
//! let mut engine = GraphEngine::new();
//! engine.apply(IndexCommand::modify("Team", "<<manages+>>[[Project]]"));
//! let model = engine.model(Vec::<String>::new());
//! assert_eq!(model.edge_count(), 1);
//! assert!(model.node("Project").unwrap().is_ghost);
//! ```

pub mod config;
mod engine;
pub mod grammar;
pub mod index;
pub mod layout;
pub mod model;
pub mod vault;
pub mod view;

pub use config::{ConfigError, ConfigResult, DirectionColors, Settings};
pub use engine::GraphEngine;
pub use grammar::{parse, DescriptorParser, Direction, Relationship, Syntax};
pub use index::{ChangeCoalescer, IndexChange, IndexCommand, RelationshipIndex, RenameOutcome};
pub use layout::{LayoutDriver, LayoutFrame, LayoutParams, Simulation, TickStatus, Vec2};
pub use model::{build, EdgeBundle, GraphModel, GraphNode, LabelFilter};
pub use vault::{Document, Vault, VaultError, VaultResult};
pub use view::{activate_edge, activate_node, EdgeActivation, GraphView, NodeActivation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
