//! Key-value persistence slot for the cart.
//!
//! The cart is stored as a JSON array under [`CART_STORAGE_KEY`]. Storage is
//! injected through the [`CartStorage`] trait:
//! - [`MemoryStorage`] - process-local map, used by tests
//! - [`FileStorage`] - one file per key inside a data directory

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rocketshoes_core::Product;
use thiserror::Error;

/// Key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors that can occur when reading or writing the persistence slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped to a storage location.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A string-keyed, string-valued persistence slot.
pub trait CartStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Read the persisted cart.
///
/// Absence, read failures and malformed content all yield an empty cart.
/// Nothing is surfaced to the shopper.
pub fn load_cart(storage: &impl CartStorage) -> Vec<Product> {
    let raw = match storage.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read persisted cart, starting empty");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Persisted cart is malformed, starting empty");
        Vec::new()
    })
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-seeded with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Number of successful `set` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current value under `key`.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.peek(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// File-backed storage: each key maps to `<dir>/<sanitized key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let name = file_name_for_key(key).ok_or_else(|| StorageError::InvalidKey(key.to_string()))?;
        Ok(self.dir.join(name))
    }
}

impl CartStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a crash never leaves a half-written cart.
        // Each write gets its own temp file; concurrent sessions must not share one.
        let tmp = path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path).inspect_err(|_| {
            let _ = std::fs::remove_file(&tmp);
        })?;
        Ok(())
    }
}

/// Map a storage key to a filesystem-safe file name.
///
/// `@RocketShoes:cart` -> `rocketshoes_cart.json`
fn file_name_for_key(key: &str) -> Option<String> {
    let mut name = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_end_matches('_');

    if name.is_empty() {
        None
    } else {
        Some(format!("{name}.json"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::ProductId;

    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("rocketshoes-storage-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_name_for_key() {
        assert_eq!(
            file_name_for_key(CART_STORAGE_KEY).as_deref(),
            Some("rocketshoes_cart.json")
        );
        assert_eq!(file_name_for_key("../../etc/passwd").as_deref(), Some("etc_passwd.json"));
        assert_eq!(file_name_for_key("@::"), None);
    }

    #[test]
    fn test_memory_storage_counts_writes() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v1").unwrap();
        storage.set("k", "v2").unwrap();

        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn test_memory_storage_clones_share_state() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        clone.set("k", "v").unwrap();
        assert_eq!(storage.peek("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = temp_dir();
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), None);
        storage.set(CART_STORAGE_KEY, "[]").unwrap();
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        assert!(dir.join("rocketshoes_cart.json").exists());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_storage_concurrent_writers_all_succeed() {
        let dir = temp_dir();
        let values: Vec<String> = (0..8).map(|i| format!("[{{\"id\":{i},\"amount\":1}}]")).collect();

        std::thread::scope(|scope| {
            for value in &values {
                let storage = FileStorage::new(&dir);
                scope.spawn(move || {
                    for _ in 0..25 {
                        storage.set(CART_STORAGE_KEY, value).unwrap();
                    }
                });
            }
        });

        let stored = FileStorage::new(&dir).get(CART_STORAGE_KEY).unwrap().unwrap();
        assert!(values.contains(&stored));
        // No temp files left behind
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_storage_rejects_empty_key() {
        let storage = FileStorage::new(temp_dir());
        assert!(matches!(
            storage.set("::", "[]"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_load_cart_missing_is_empty() {
        assert!(load_cart(&MemoryStorage::new()).is_empty());
    }

    #[test]
    fn test_load_cart_malformed_is_empty() {
        let storage = MemoryStorage::with_entry(CART_STORAGE_KEY, "{not json");
        assert!(load_cart(&storage).is_empty());

        let storage = MemoryStorage::with_entry(CART_STORAGE_KEY, r#"{"id": 1}"#);
        assert!(load_cart(&storage).is_empty());
    }

    #[test]
    fn test_load_cart_parses_entries() {
        let storage = MemoryStorage::with_entry(
            CART_STORAGE_KEY,
            r#"[{"id":1,"title":"Shoe","amount":2},{"id":4,"amount":1}]"#,
        );

        let cart = load_cart(&storage);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].id, ProductId::new(1));
        assert_eq!(cart[0].amount, 2);
        assert_eq!(cart[1].id, ProductId::new(4));
    }
}
