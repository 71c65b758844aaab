use std::time::Duration;

use chrono::{DateTime, Utc};

pub const HISTORY_LIMIT: usize = 10;

pub type EntryId = u64;

/// One answered question. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub id: EntryId,
    pub question: String,
    pub answer: String,
    pub latency: Duration,
    pub completed_at: DateTime<Utc>,
}

/// Past query results, most recent first, never longer than [`HISTORY_LIMIT`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    entries: Vec<QueryResult>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from entries already ordered most recent first.
    pub fn from_entries(mut entries: Vec<QueryResult>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }

    pub fn push(&mut self, entry: QueryResult) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn entries(&self) -> &[QueryResult] {
        &self.entries
    }

    pub fn find(&self, id: EntryId) -> Option<&QueryResult> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    pub(crate) fn next_id(&self) -> EntryId {
        self.entries
            .iter()
            .map(|entry| entry.id)
            .max()
            .map_or(1, |max| max + 1)
    }
}
