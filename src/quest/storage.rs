//! Durable snapshot storage.
//!
//! `BrowserStorage` writes straight to `window.localStorage`, so the module
//! must be hosted on the page's main thread. `MemoryStorage` backs native
//! builds and tests, and is the fallback when there is no usable window
//! storage (a Web Worker, or storage disabled by the user). That fallback does
//! not survive a reload; `init` reports it at `error`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageError;

/// Keyed blob store. Values are whole serialized snapshots.
pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Whether saved values outlive the page.
    fn is_durable(&self) -> bool {
        true
    }
}

/// In-memory store. Clones share the same map, so a clone can stand in for
/// "the same localStorage after a reload".
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}

#[cfg(target_arch = "wasm32")]
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    pub fn new() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl SnapshotStore for BrowserStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // QuotaExceededError surfaces here.
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}

/// The store used when nothing else has been installed.
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Rc<dyn SnapshotStore> {
    match BrowserStorage::new() {
        Ok(store) => Rc::new(store),
        Err(e) => {
            log::warn!("{}; quest progress will not survive a reload", e);
            Rc::new(MemoryStorage::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Rc<dyn SnapshotStore> {
    Rc::new(MemoryStorage::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_is_not_durable() {
        assert!(!MemoryStorage::new().is_durable());
        assert!(!default_store().is_durable());
    }

    #[test]
    fn memory_load_missing_is_none() {
        let store = MemoryStorage::new();
        assert!(store.load("nothing").unwrap().is_none());
    }

    #[test]
    fn memory_save_overwrites() {
        let store = MemoryStorage::new();
        store.save("k", "one").unwrap();
        store.save("k", "two").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn memory_clones_share_entries() {
        let store = MemoryStorage::new();
        let other = store.clone();
        store.save("k", "v").unwrap();
        assert_eq!(other.load("k").unwrap().as_deref(), Some("v"));
        other.remove("k").unwrap();
        assert!(store.load("k").unwrap().is_none());
    }
}
