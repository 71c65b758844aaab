use std::time::Duration;

use chrono::{DateTime, Utc};
use client_logging::{client_error, client_info, client_warn};
use rag_client_core::QueryResult;
use rag_client_engine::{FileStore, PersistError};
use serde::{Deserialize, Serialize};

/// Storage key of the serialized history.
pub(crate) const HISTORY_KEY: &str = "rag_client_history.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedEntry {
    id: u64,
    question: String,
    answer: String,
    latency: Duration,
    timestamp: DateTime<Utc>,
}

impl From<&QueryResult> for PersistedEntry {
    fn from(entry: &QueryResult) -> Self {
        Self {
            id: entry.id,
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            latency: entry.latency,
            timestamp: entry.completed_at,
        }
    }
}

impl From<PersistedEntry> for QueryResult {
    fn from(entry: PersistedEntry) -> Self {
        Self {
            id: entry.id,
            question: entry.question,
            answer: entry.answer,
            latency: entry.latency,
            completed_at: entry.timestamp,
        }
    }
}

pub(crate) fn encode_history(entries: &[QueryResult]) -> Result<String, ron::Error> {
    let persisted: Vec<PersistedEntry> = entries.iter().map(PersistedEntry::from).collect();
    ron::ser::to_string_pretty(&persisted, ron::ser::PrettyConfig::new())
}

pub(crate) fn decode_history(content: &str) -> Result<Vec<QueryResult>, PersistError> {
    let persisted: Vec<PersistedEntry> =
        ron::from_str(content).map_err(|err| PersistError::Corrupt {
            key: HISTORY_KEY.to_string(),
            reason: err.to_string(),
        })?;
    Ok(persisted.into_iter().map(QueryResult::from).collect())
}

pub(crate) fn try_load_history(store: &FileStore) -> Result<Vec<QueryResult>, PersistError> {
    match store.read(HISTORY_KEY)? {
        Some(content) => decode_history(&content),
        None => Ok(Vec::new()),
    }
}

/// Loads the stored history. A missing or unreadable record yields an empty
/// history; it never prevents startup.
pub(crate) fn load_history(store: &FileStore) -> Vec<QueryResult> {
    match try_load_history(store) {
        Ok(entries) => {
            client_info!(
                "Loaded {} history entries from {:?}",
                entries.len(),
                store.path_for(HISTORY_KEY)
            );
            entries
        }
        Err(err) => {
            client_warn!("Discarding stored history: {}", err);
            Vec::new()
        }
    }
}

pub(crate) fn save_history(store: &FileStore, entries: &[QueryResult]) {
    let content = match encode_history(entries) {
        Ok(text) => text,
        Err(err) => {
            client_error!("Failed to serialize history: {}", err);
            return;
        }
    };

    if let Err(err) = store.write(HISTORY_KEY, &content) {
        client_error!(
            "Failed to write history to {:?}: {}",
            store.path_for(HISTORY_KEY),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entry(id: u64) -> QueryResult {
        QueryResult {
            id,
            question: format!("question {id}"),
            answer: "**1.** answer with \"quotes\"\n\n---\n*Search scope: Global*".to_string(),
            latency: Duration::from_nanos(1_234_567_891),
            completed_at: Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 15).unwrap()
                + chrono::Duration::nanoseconds(987_654_321),
        }
    }

    #[test]
    fn history_entry_survives_encode_and_decode() {
        let entries = vec![entry(2), entry(1)];
        let text = encode_history(&entries).unwrap();
        assert_eq!(decode_history(&text).unwrap(), entries);
    }

    #[test]
    fn saved_history_is_loaded_back() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("state"));

        save_history(&store, &[entry(7)]);
        assert_eq!(load_history(&store), vec![entry(7)]);
    }

    #[test]
    fn missing_history_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().to_path_buf());

        assert!(try_load_history(&store).unwrap().is_empty());
        assert!(load_history(&store).is_empty());
    }

    #[test]
    fn corrupt_history_resets_to_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().to_path_buf());
        store.write(HISTORY_KEY, "[(id: 1, question: ").unwrap();

        assert!(matches!(
            try_load_history(&store),
            Err(PersistError::Corrupt { .. })
        ));
        assert!(load_history(&store).is_empty());
    }
}
