//! Append-only session history of analyzed texts.

use serde::Serialize;

use crate::models::HistoryEntry;

/// Insertion-ordered log of history entries for one session.
///
/// Entries can only be appended. Presentation order (newest first) is
/// applied by [`SessionHistory::newest_first`] at render time; the stored
/// order never changes.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries from the most recent to the oldest.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }
}
