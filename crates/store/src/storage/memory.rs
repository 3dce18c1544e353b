//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::StorageError;

use super::CartStorage;

/// Storage backed by a `HashMap`.
///
/// Cloning yields another handle to the same map, so a test can keep one
/// handle while the store's persister owns another. The backend can be
/// switched off with [`MemoryStorage::set_available`] to simulate a device
/// whose storage is unreachable.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    inner: Arc<MemoryStorageInner>,
}

#[derive(Debug)]
struct MemoryStorageInner {
    blobs: RwLock<HashMap<String, String>>,
    available: AtomicBool,
    writes: AtomicUsize,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Create an empty, available storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryStorageInner {
                blobs: RwLock::new(HashMap::new()),
                available: AtomicBool::new(true),
                writes: AtomicUsize::new(0),
            }),
        }
    }

    /// Create a storage that already holds `blob` under `key`.
    #[must_use]
    pub fn with_blob(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut blobs) = storage.inner.blobs.write() {
            blobs.insert(key.into(), blob.into());
        }
        storage
    }

    /// Make every subsequent `get` and `set` succeed or fail.
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    /// Read a blob without going through the async interface.
    #[must_use]
    pub fn blob(&self, key: &str) -> Option<String> {
        self.inner
            .blobs
            .read()
            .ok()
            .and_then(|blobs| blobs.get(key).cloned())
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.inner.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory storage is offline".to_string()))
        }
    }
}

impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        let blobs = self
            .inner
            .blobs
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    async fn set(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.inner
            .blobs
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?
            .insert(key.to_owned(), blob.to_owned());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let storage = MemoryStorage::new();
        storage.set("k", "[]").await.unwrap();

        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.writes(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_blobs() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        other.set("k", "v").await.unwrap();

        assert_eq!(storage.blob("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_unavailable_fails_both_ways() {
        let storage = MemoryStorage::with_blob("k", "v");
        storage.set_available(false);

        assert!(matches!(
            storage.get("k").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(storage.set("k", "w").await.is_err());
        assert_eq!(storage.writes(), 0);

        storage.set_available(true);
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
