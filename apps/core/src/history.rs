use crate::kv_store::{KeyValueStore, StoreError};

pub const HISTORY_KEY: &str = "searchHistory";
pub const MAX_HISTORY_ENTRIES: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to encode search history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Recent successful search terms, most recent first, unique ignoring case.
pub struct HistoryStore<K> {
    store: K,
}

impl<K: KeyValueStore> HistoryStore<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn record(&self, term: &str) -> Result<(), HistoryError> {
        if term.trim().is_empty() {
            return Ok(());
        }

        let lowered = term.to_lowercase();
        let mut entries = self.list();
        entries.retain(|entry| entry.to_lowercase() != lowered);
        entries.insert(0, term.to_string());
        entries.truncate(MAX_HISTORY_ENTRIES);

        let encoded = serde_json::to_string(&entries)?;
        self.store.set(HISTORY_KEY, &encoded)?;
        Ok(())
    }

    /// Missing, unreadable or malformed history reads as empty.
    pub fn list(&self) -> Vec<String> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!(%error, "search history unreadable; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!(%error, "search history malformed; treating as empty");
                Vec::new()
            }
        }
    }

    pub fn clear(&self) -> Result<(), HistoryError> {
        self.store.remove(HISTORY_KEY)?;
        Ok(())
    }
}
