//! Turns document text into relationship facts

use super::descriptor::classify;
use super::relationship::{normalize_identifier, Relationship};
use super::scan::{Scanner, Syntax};
use tracing::debug;

/// Parser for relationship declarations.
///
/// Stateless apart from the accepted syntax; `parse` is a pure function of
/// its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptorParser {
    syntax: Syntax,
}

impl DescriptorParser {
    pub fn new(syntax: Syntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Extract every well-formed relationship declared in `text`.
    ///
    /// Malformed descriptors and empty targets are skipped silently, but
    /// still consume an occurrence slot so ids of later declarations do not
    /// depend on whether earlier ones were accepted.
    pub fn parse(&self, text: &str, source_id: &str) -> Vec<Relationship> {
        let source = normalize_identifier(source_id);
        let mut relationships = Vec::new();

        // running line count, so each match only scans the gap since the last
        let mut line = 1;
        let mut counted_to = 0;
        let mut skipped = 0;

        for (occurrence, m) in Scanner::new(text, self.syntax).enumerate() {
            line += text[counted_to..m.start].matches('\n').count();
            counted_to = m.start;

            let target = target_name(m.target);
            if target.is_empty() {
                skipped += 1;
                continue;
            }
            let Some(classified) = classify(m.descriptor) else {
                skipped += 1;
                continue;
            };

            relationships.push(Relationship::new(
                source.clone(),
                target,
                classified.direction,
                classified.label,
                line,
                occurrence,
            ));
        }

        debug!(
            source = %source,
            accepted = relationships.len(),
            skipped,
            "parsed relationship declarations"
        );
        relationships
    }
}

/// Resolve the target part of `[[target|alias]]` to a document identifier.
fn target_name(raw: &str) -> String {
    let name = raw.split('|').next().unwrap_or(raw);
    normalize_identifier(name)
}

/// Parse `text` with the canonical syntax.
pub fn parse(text: &str, source_id: &str) -> Vec<Relationship> {
    DescriptorParser::default().parse(text, source_id)
}
