//! Inline relationship grammar
//!
//! Declarations look like `<<descriptor>>[[Target]]`. The descriptor encodes
//! direction and an optional label:
//!
//! | Descriptor      | Direction       | Label        |
//! |-----------------|-----------------|--------------|
//! | `-+`            | outgoing        | none         |
//! | `+-`            | incoming        | none         |
//! | `++`            | bidirectional   | none         |
//! | `+label+`       | bidirectional   | `label`      |
//! | `+label`        | incoming        | `label`      |
//! | `label+`        | outgoing        | `label`      |
//! | `label`         | undirected      | `label`      |
//!
//! Anything else (dashes only, empty, empty label) is not a declaration.

mod descriptor;
mod parser;
mod relationship;
mod scan;

pub use descriptor::{classify, Classified};
pub use parser::{parse, DescriptorParser};
pub use relationship::{normalize_identifier, relationship_id, Direction, Relationship};
pub use scan::{DescriptorMatch, Form, Scanner, Syntax};
