//! Persistent State Store
//!
//! A thin key/value layer over a [`KeyValueBackend`]. Values are stored as
//! JSON text. Reads fall back to a caller-supplied default and writes never
//! fail loudly: problems are logged and reported as a boolean.
//!
//! Every [`Store`] handle acts as one "tab". Handles opened with
//! [`Store::open_tab`] share the backend and a [`StorageHub`] that
//! broadcasts a [`StorageEvent`] after each successful write. Subscribers
//! only see events from other tabs.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Browser local storage allows roughly this much per origin
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

const HUB_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw string storage. Implementations must be cheap to call repeatedly.
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
    /// Bytes used by all keys and values
    fn total_bytes(&self) -> Result<usize, StorageError>;
}

pub type TabId = u64;

/// A key changed in some tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub origin: TabId,
}

/// Fan-out of storage events between tabs sharing a backend
#[derive(Clone)]
pub struct StorageHub {
    sender: broadcast::Sender<StorageEvent>,
    next_tab: Arc<AtomicU64>,
}

impl StorageHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(HUB_CAPACITY);
        Self {
            sender,
            next_tab: Arc::new(AtomicU64::new(1)),
        }
    }

    fn allocate_tab(&self) -> TabId {
        self.next_tab.fetch_add(1, Ordering::Relaxed)
    }

    fn publish(&self, key: &str, origin: TabId) {
        // No receivers just means no other tab is listening
        let _ = self.sender.send(StorageEvent {
            key: key.to_string(),
            origin,
        });
    }
}

impl Default for StorageHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage events seen by one tab, excluding its own writes
pub struct StorageSubscription {
    receiver: broadcast::Receiver<StorageEvent>,
    tab: TabId,
}

impl StorageSubscription {
    /// Take every pending event. The flag is set when events were dropped
    /// because this subscriber fell behind.
    pub fn drain(&mut self) -> (Vec<StorageEvent>, bool) {
        let (events, lagged) = crate::sync::drain(&mut self.receiver);
        let tab = self.tab;
        (events.into_iter().filter(|e| e.origin != tab).collect(), lagged)
    }
}

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueBackend>,
    hub: StorageHub,
    tab: TabId,
    quota_bytes: Option<usize>,
}

impl Store {
    pub fn new(backend: Arc<dyn KeyValueBackend>, quota_bytes: Option<usize>) -> Self {
        let hub = StorageHub::new();
        let tab = hub.allocate_tab();
        Self {
            backend,
            hub,
            tab,
            quota_bytes,
        }
    }

    /// Unbounded in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), None)
    }

    /// Another handle on the same storage, seen by the hub as a separate tab
    pub fn open_tab(&self) -> Store {
        Store {
            backend: self.backend.clone(),
            hub: self.hub.clone(),
            tab: self.hub.allocate_tab(),
            quota_bytes: self.quota_bytes,
        }
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn subscribe(&self) -> StorageSubscription {
        StorageSubscription {
            receiver: self.hub.sender.subscribe(),
            tab: self.tab,
        }
    }

    /// Stored value under `key`, or a fresh clone of `fallback` when the key
    /// is missing, unreadable or does not deserialize.
    pub fn load<T>(&self, key: &str, fallback: &T) -> T
    where
        T: DeserializeOwned + Clone,
    {
        self.load_optional(key).unwrap_or_else(|| fallback.clone())
    }

    /// Like [`Store::load`] but reports a miss as `None`
    pub fn load_optional<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read storage key {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring corrupt value under {}: {}", key, e);
                None
            }
        }
    }

    /// Serialize and write. Returns whether the value actually reached
    /// storage; failures are logged, never raised.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => {
                tracing::debug!("Saved storage key {}", key);
                self.hub.publish(key, self.tab);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to save storage key {}: {}", key, e);
                false
            }
        }
    }

    /// Delete `key`. Missing keys are fine.
    pub fn remove(&self, key: &str) {
        match self.backend.remove(key) {
            Ok(()) => self.hub.publish(key, self.tab),
            Err(e) => tracing::warn!("Failed to remove storage key {}: {}", key, e),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.get(key), Ok(Some(_)))
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|e| {
            tracing::warn!("Failed to list storage keys: {}", e);
            Vec::new()
        })
    }

    fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;

        if let Some(quota) = self.quota_bytes {
            let existing = self
                .backend
                .get(key)?
                .map(|v| key.len() + v.len())
                .unwrap_or(0);
            let needed = self.backend.total_bytes()?.saturating_sub(existing) + key.len() + raw.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        self.backend.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{keys, Expense};

    fn expense(id: &str, amount: f64) -> Expense {
        Expense {
            id: id.to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            category: "Food".to_string(),
            amount,
            notes: "Expense".to_string(),
        }
    }

    #[test]
    fn test_missing_key_returns_fallback_copy() {
        let store = Store::in_memory();
        let fallback = vec![1, 2, 3];

        let mut first: Vec<i32> = store.load("missing-key", &fallback);
        let second: Vec<i32> = store.load("missing-key", &fallback);
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(second, vec![1, 2, 3]);

        first.push(4);
        assert_eq!(second, vec![1, 2, 3]);
        assert_eq!(fallback, vec![1, 2, 3]);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = Store::in_memory();
        let expenses = vec![expense("a", 12.5), expense("b", 3.0)];

        assert!(store.save(keys::EXPENSES, &expenses));
        let loaded: Vec<Expense> = store.load(keys::EXPENSES, &Vec::new());
        assert_eq!(loaded, expenses);
    }

    #[test]
    fn test_corrupt_value_is_a_miss() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set(keys::EXPENSES, "{not json").unwrap();
        let store = Store::new(backend, None);

        let loaded: Vec<Expense> = store.load(keys::EXPENSES, &Vec::new());
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_quota_exceeded_is_reported_not_raised() {
        let store = Store::new(Arc::new(MemoryBackend::new()), Some(64));
        assert!(store.save("k", &"small"));

        let big = "x".repeat(100);
        assert!(!store.save("other", &big));
        assert!(!store.contains("other"));

        // Overwriting an existing key only counts the difference
        assert!(store.save("k", &"replaced"));
    }

    #[test]
    fn test_remove_tolerates_missing_key() {
        let store = Store::in_memory();
        store.remove("never-set");
        assert!(store.save("k", &1));
        store.remove("k");
        assert!(!store.contains("k"));
    }

    #[test]
    fn test_storage_events_skip_own_tab() {
        let tab_a = Store::in_memory();
        let tab_b = tab_a.open_tab();
        let mut events_a = tab_a.subscribe();
        let mut events_b = tab_b.subscribe();

        assert!(tab_a.save(keys::USER, &"someone"));
        tab_b.remove(keys::THEME);

        let (seen_by_a, lagged) = events_a.drain();
        assert!(!lagged);
        assert_eq!(
            seen_by_a,
            vec![StorageEvent { key: keys::THEME.to_string(), origin: tab_b.tab() }]
        );

        let (seen_by_b, _) = events_b.drain();
        assert_eq!(seen_by_b.len(), 1);
        assert_eq!(seen_by_b[0].key, keys::USER);

        // Both tabs read the same data
        assert_eq!(tab_b.load::<String>(keys::USER, &String::new()), "someone");
    }

    #[test]
    fn test_failed_save_publishes_nothing() {
        let tab_a = Store::new(Arc::new(MemoryBackend::new()), Some(8));
        let tab_b = tab_a.open_tab();
        let mut events_b = tab_b.subscribe();

        assert!(!tab_a.save(keys::EXPENSES, &vec![expense("a", 1.0)]));
        assert!(events_b.drain().0.is_empty());
    }
}
