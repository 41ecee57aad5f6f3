//! Graph model: nodes with ghost flags, edges with bundle offsets

mod builder;
mod types;


pub use builder::{build, ExistingDocuments, LabelFilter, CURVE_SPACING};
pub use types::{EdgeBundle, GraphModel, GraphNode};
