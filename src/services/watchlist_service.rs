use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::utils::BotError;

/// Named symbol list persisted to a JSON file.
///
/// The in-memory map is the source of truth; the file is rewritten after
/// every mutation. A `BTreeMap` keeps `/watchlist` output stable.
pub struct WatchlistStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl WatchlistStore {
    /// Load the watchlist from `path`, falling back to a starter list when
    /// the file is missing or unreadable.
    pub fn load(path: PathBuf) -> Self {
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => {
                    info!("Loaded {} watchlist entries from {}", map.len(), path.display());
                    map
                }
                Err(e) => {
                    warn!("Ignoring malformed watchlist file {}: {}", path.display(), e);
                    Self::default_entries()
                }
            },
            Err(_) => Self::default_entries(),
        };
        WatchlistStore {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn default_entries() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Apple".to_string(), "AAPL".to_string()),
            ("Bitcoin".to_string(), "BTC-USD".to_string()),
            ("Microsoft".to_string(), "MSFT".to_string()),
            ("Tesla".to_string(), "TSLA".to_string()),
        ])
    }

    /// Current entries as (name, symbol) pairs, ordered by name
    pub async fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|(name, symbol)| (name.clone(), symbol.clone()))
            .collect()
    }

    /// Add or replace one entry and persist
    pub async fn add(&self, name: &str, symbol: &str) -> Result<(), BotError> {
        let mut entries = self.entries.lock().await;
        entries.insert(name.to_string(), symbol.to_uppercase());
        self.save(&entries)
    }

    /// Remove an entry by name; Ok(false) when the name was not present
    pub async fn remove(&self, name: &str) -> Result<bool, BotError> {
        let mut entries = self.entries.lock().await;
        let removed = entries.remove(name).is_some();
        if removed {
            self.save(&entries)?;
        }
        Ok(removed)
    }

    /// Parse `NAME SYMBOL` lines and add every well-formed one.
    ///
    /// Returns the added pairs and the number of skipped malformed lines.
    pub async fn bulk_add(&self, lines: &str) -> Result<(Vec<(String, String)>, usize), BotError> {
        let mut added = Vec::new();
        let mut skipped = 0;

        let mut entries = self.entries.lock().await;
        for line in lines.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if let [name, symbol] = parts.as_slice() {
                let symbol = symbol.to_uppercase();
                entries.insert(name.to_string(), symbol.clone());
                added.push((name.to_string(), symbol));
            } else if !parts.is_empty() {
                warn!("Skipping invalid watchlist line: {}", line);
                skipped += 1;
            }
        }

        if !added.is_empty() {
            self.save(&entries)?;
        }
        Ok((added, skipped))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), BotError> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| BotError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| BotError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> WatchlistStore {
        let path = std::env::temp_dir().join(format!("candlegram_watchlist_{}.json", tag));
        let _ = std::fs::remove_file(&path);
        WatchlistStore::load(path)
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let store = temp_store("defaults");
        assert!(!store.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_and_remove_round_trip() {
        let store = temp_store("roundtrip");
        store.add("Nvidia", "nvda").await.unwrap();

        // Reload from disk: the entry survives, symbol upper-cased
        let reloaded = WatchlistStore::load(store.path.clone());
        let entries = reloaded.entries().await;
        assert!(entries.contains(&("Nvidia".to_string(), "NVDA".to_string())));

        assert!(reloaded.remove("Nvidia").await.unwrap());
        assert!(!reloaded.remove("Nvidia").await.unwrap());
    }

    #[tokio::test]
    async fn test_bulk_add_skips_malformed_lines() {
        let store = temp_store("bulk");
        let (added, skipped) = store
            .bulk_add("Amazon AMZN\nthis line is wrong\nGoogle GOOG\n")
            .await
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(skipped, 1);
        let entries = store.entries().await;
        assert!(entries.contains(&("Google".to_string(), "GOOG".to_string())));
    }
}
