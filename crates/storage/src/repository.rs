use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Fixed keys the site writes into local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    User,
    Theme,
    Preferences,
    CourseProgress,
    Admin,
}

impl StorageKey {
    pub const ALL: [StorageKey; 5] = [
        StorageKey::User,
        StorageKey::Theme,
        StorageKey::Preferences,
        StorageKey::CourseProgress,
        StorageKey::Admin,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::User => "electrolearn_user",
            StorageKey::Theme => "electrolearn_theme",
            StorageKey::Preferences => "electrolearn_preferences",
            StorageKey::CourseProgress => "electrolearn_course_progress",
            StorageKey::Admin => "electrolearn_admin",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-to-string persistent storage, the shape of the browser's `localStorage`.
///
/// Writes replace the whole value for a key; there is no partial update.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// List stored keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Simple in-memory store for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-filled with raw entries, e.g. corrupt values in tests.
    #[must_use]
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            items: Arc::new(Mutex::new(items)),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Holds the active backend behind a trait object so callers can swap it.
#[derive(Clone)]
pub struct Storage {
    pub local: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            local: Arc::new(InMemoryStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove_cycle() {
        let store = InMemoryStore::new();
        assert_eq!(store.get_item("k").await.unwrap(), None);

        store.set_item("k", "v1").await.unwrap();
        store.set_item("k", "v2").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("v2"));

        store.remove_item("k").await.unwrap();
        store.remove_item("k").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_state_and_keys_are_sorted() {
        let store = InMemoryStore::with_items([("b", "2"), ("a", "1")]);
        let clone = store.clone();
        clone.set_item("c", "3").await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn storage_keys_are_prefixed_and_distinct() {
        let names: std::collections::HashSet<_> =
            StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), StorageKey::ALL.len());
        assert!(names.iter().all(|n| n.starts_with("electrolearn_")));
        assert_eq!(StorageKey::User.to_string(), "electrolearn_user");
    }
}
