//! Coalescing of bursty modify notifications
//!
//! Hosts report a modify on every keystroke. Callers record those here and
//! reindex a document only once it has been quiet for the debounce window.

use crate::grammar::normalize_identifier;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default quiet period before a modified document is reindexed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tracks pending modifications per document.
#[derive(Debug, Clone)]
pub struct ChangeCoalescer {
    window: Duration,
    pending: HashMap<String, Instant>,
}

impl Default for ChangeCoalescer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl ChangeCoalescer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a modification seen at `now`, restarting the document's window.
    pub fn note_modified(&mut self, id: &str, now: Instant) {
        self.pending.insert(normalize_identifier(id), now);
    }

    /// Drop a pending modification (the document was deleted).
    pub fn forget(&mut self, id: &str) -> bool {
        self.pending.remove(&normalize_identifier(id)).is_some()
    }

    /// Carry a pending modification over to the document's new name.
    pub fn rename(&mut self, old_id: &str, new_id: &str) {
        if let Some(seen) = self.pending.remove(&normalize_identifier(old_id)) {
            self.pending.insert(normalize_identifier(new_id), seen);
        }
    }

    /// Take every document that has been quiet for the full window.
    ///
    /// Returned in name order so reindexing is deterministic.
    pub fn drain_quiescent(&mut self, now: Instant) -> Vec<String> {
        let window = self.window;
        let mut ready: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, seen)| now.saturating_duration_since(**seen) >= window)
            .map(|(id, _)| id.clone())
            .collect();
        ready.sort();
        for id in &ready {
            self.pending.remove(id);
        }
        ready
    }

    /// Earliest instant at which some pending document becomes quiet
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|seen| *seen + self.window).min()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
