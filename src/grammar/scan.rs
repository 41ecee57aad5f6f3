//! Lexical scan for relationship declarations
//!
//! Produces a lazy, restartable sequence of raw matches. The scanner does not
//! judge descriptors or targets; it only finds `<<descriptor>>[[target]]`
//! (and, when enabled, the legacy `<descriptor>[[target]]`) spans.

use serde::{Deserialize, Serialize};

/// Which declaration forms the scanner recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Syntax {
    /// Only `<<descriptor>>[[target]]`
    #[default]
    Canonical,
    /// Also accept the older `<descriptor>[[target]]`
    CanonicalAndLegacy,
}

/// Delimiter form of a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Canonical,
    Legacy,
}

/// A raw declaration found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorMatch<'a> {
    /// Byte offset of the opening `<`
    pub start: usize,
    /// Byte offset just past the closing `]]`
    pub end: usize,
    /// Text between the angle delimiters, untrimmed
    pub descriptor: &'a str,
    /// Text between `[[` and `]]`, untrimmed
    pub target: &'a str,
    pub form: Form,
}

/// Iterator over declarations in a text, left to right, non-overlapping.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    cursor: usize,
    syntax: Syntax,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str, syntax: Syntax) -> Self {
        Self {
            text,
            cursor: 0,
            syntax,
        }
    }

    /// Try to read a declaration whose opening `<` sits at `start`.
    fn match_at(&self, start: usize) -> Option<DescriptorMatch<'a>> {
        let rest = &self.text[start..];
        if rest.starts_with("<<") {
            if let Some(m) = self.read(start, 2, ">>", Form::Canonical) {
                return Some(m);
            }
        }
        if self.syntax == Syntax::CanonicalAndLegacy && !rest.starts_with("<<") {
            return self.read(start, 1, ">", Form::Legacy);
        }
        None
    }

    fn read(
        &self,
        start: usize,
        open_len: usize,
        close: &str,
        form: Form,
    ) -> Option<DescriptorMatch<'a>> {
        let text = self.text;
        let desc_start = start + open_len;
        let desc_len = text[desc_start..]
            .find(|c: char| matches!(c, '<' | '>' | '\n' | '\r'))?;
        let desc_end = desc_start + desc_len;

        let after = &text[desc_end..];
        if !after.starts_with(close) || !after[close.len()..].starts_with("[[") {
            return None;
        }

        let target_start = desc_end + close.len() + 2;
        let target_len = text[target_start..]
            .find(|c: char| matches!(c, '[' | ']' | '\n' | '\r'))?;
        let target_end = target_start + target_len;
        if !text[target_end..].starts_with("]]") {
            return None;
        }

        Some(DescriptorMatch {
            start,
            end: target_end + 2,
            descriptor: &text[desc_start..desc_end],
            target: &text[target_start..target_end],
            form,
        })
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = DescriptorMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.text.len() {
            let offset = self.text[self.cursor..].find('<')?;
            let start = self.cursor + offset;
            if let Some(m) = self.match_at(start) {
                self.cursor = m.end;
                return Some(m);
            }
            self.cursor = start + 1;
        }
        None
    }
}
