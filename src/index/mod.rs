//! Incremental relationship index
//!
//! Holds the relationships of every parsed document and keeps them
//! consistent under modify, delete and rename without rescanning.

mod coalesce;
mod events;
mod store;

pub use coalesce::{ChangeCoalescer, DEFAULT_DEBOUNCE};
pub use events::{IndexChange, IndexCommand};
pub use store::{RelationshipIndex, RenameOutcome};
