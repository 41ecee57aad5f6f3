//! Common test utilities for relgraph integration tests
//!
//! Fixture vaults on disk, small engine builders and a regex oracle for
//! the canonical declaration pattern.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;

pub use fixtures::{engine_with, no_prior, TestVault};

/// Count canonical declarations with a regex, independent of the scanner.
pub fn canonical_match_count(text: &str) -> usize {
    let re = regex_lite::Regex::new(r"<<([^<>\r\n]*)>>\[\[([^\[\]\r\n]*)\]\]").unwrap();
    re.find_iter(text).count()
}
