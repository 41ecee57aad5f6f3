//! Descriptor classification
//!
//! A descriptor is the text between the angle delimiters. Boundary `+`
//! characters encode direction: leading `+` points into the source, trailing
//! `+` points out of it, both means bidirectional. Without boundary `+` the
//! descriptor is an undirected label, provided it has some alphanumeric
//! content. Everything else is rejected.

use super::relationship::Direction;

/// Outcome of classifying a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub direction: Direction,
    pub label: Option<String>,
}

impl Classified {
    fn bare(direction: Direction) -> Self {
        Self {
            direction,
            label: None,
        }
    }

    fn labeled(direction: Direction, label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Some(Self {
            direction,
            label: Some(label.to_string()),
        })
    }
}

/// Classify a raw descriptor. Returns `None` for malformed descriptors.
pub fn classify(raw: &str) -> Option<Classified> {
    let d = raw.trim();

    match d {
        "-+" => return Some(Classified::bare(Direction::Outgoing)),
        "+-" => return Some(Classified::bare(Direction::Incoming)),
        "++" => return Some(Classified::bare(Direction::Bidirectional)),
        _ => {}
    }

    let leading = d.starts_with('+');
    let trailing = d.ends_with('+');

    match (leading, trailing) {
        // a lone "+" both starts and ends with '+' but has no interior
        (true, true) if d.len() > 2 => {
            Classified::labeled(Direction::Bidirectional, &d[1..d.len() - 1])
        }
        (true, true) => None,
        (true, false) => Classified::labeled(Direction::Incoming, &d[1..]),
        (false, true) => Classified::labeled(Direction::Outgoing, &d[..d.len() - 1]),
        (false, false) if d.chars().any(char::is_alphanumeric) => {
            Classified::labeled(Direction::Undirected, d)
        }
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(raw: &str) -> Option<Direction> {
        classify(raw).map(|c| c.direction)
    }

    fn label(raw: &str) -> Option<String> {
        classify(raw).and_then(|c| c.label)
    }

    #[test]
    fn bare_arrows() {
        assert_eq!(dir("-+"), Some(Direction::Outgoing));
        assert_eq!(dir("+-"), Some(Direction::Incoming));
        assert_eq!(dir("++"), Some(Direction::Bidirectional));
        assert_eq!(label("-+"), None);
        assert_eq!(dir("  -+ "), Some(Direction::Outgoing));
    }

    #[test]
    fn labeled_directions() {
        let c = classify("+works with+").unwrap();
        assert_eq!(c.direction, Direction::Bidirectional);
        assert_eq!(c.label.as_deref(), Some("works with"));

        let c = classify("+reports to").unwrap();
        assert_eq!(c.direction, Direction::Incoming);
        assert_eq!(c.label.as_deref(), Some("reports to"));

        let c = classify("manages +").unwrap();
        assert_eq!(c.direction, Direction::Outgoing);
        assert_eq!(c.label.as_deref(), Some("manages"));
    }

    #[test]
    fn undirected_label() {
        let c = classify(" related ").unwrap();
        assert_eq!(c.direction, Direction::Undirected);
        assert_eq!(c.label.as_deref(), Some("related"));
        assert_eq!(dir("a+b"), Some(Direction::Undirected));
    }

    #[test]
    fn empty_interior_is_malformed() {
        assert_eq!(classify("+ +"), None);
        assert_eq!(classify("+  "), None);
        assert_eq!(classify("  +"), None);
        assert_eq!(classify("+"), None);
    }

    #[test]
    fn dashes_and_empty_are_malformed() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
        assert_eq!(classify("-"), None);
        assert_eq!(classify("--"), None);
        assert_eq!(classify("---"), None);
        assert_eq!(classify("-- --"), None);
    }

    #[test]
    fn unicode_labels_count_as_content() {
        let c = classify("関連").unwrap();
        assert_eq!(c.direction, Direction::Undirected);
        let c = classify("+führt+").unwrap();
        assert_eq!(c.label.as_deref(), Some("führt"));
    }
}
