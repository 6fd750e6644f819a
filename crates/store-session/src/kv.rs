//! In-process key/value store with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Type-safe cache over an in-process key/value map.
///
/// Values are stored as JSON bytes. Clones share the same map, so one
/// `Cache` can be handed to every request handler.
#[derive(Clone, Default)]
pub struct Cache {
    store: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl Cache {
    /// Open an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let store = self.read()?;
        match store.get(key) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.write()?.remove(key);
        Ok(())
    }

    /// Read, transform and write one key while holding the write lock.
    ///
    /// `f` sees the current value and returns the value to store plus a
    /// result for the caller. If `f` fails nothing is written.
    pub fn modify<T, R, F>(&self, key: &str, f: F) -> Result<R, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> Result<(T, R), CacheError>,
    {
        let mut store = self.write()?;
        let current = match store.get(key) {
            Some(bytes) => Some(serde_json::from_slice(bytes)?),
            None => None,
        };
        let (next, result) = f(current)?;
        store.insert(key.to_string(), serde_json::to_vec(&next)?);
        Ok(result)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
        self.store
            .read()
            .map_err(|_| CacheError::StoreError("cache lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
        self.store
            .write()
            .map_err(|_| CacheError::StoreError("cache lock poisoned".to_string()))
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use store_session::cache_key;
///
/// let key = cache_key!("session", "abc");
/// assert_eq!(key, "session:abc");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
