//! Key/value persistence behind the session store and preferences.
//!
//! In the browser this is `window.localStorage`; tests use an in-memory map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{ClientError, ClientResult};

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// `window.localStorage`, looked up on every access so the handle stays `Send`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage(&self) -> ClientResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| ClientError::Storage("no window available".to_string()))?
            .local_storage()
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| ClientError::Storage("localStorage is disabled".to_string()))
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> ClientResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Storage("storage lock poisoned".to_string()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Named user preferences layered over the same storage as the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preferences<S> {
    storage: S,
}

impl<S: KeyValueStorage> Preferences<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.storage.get(key)?.filter(|v| !v.is_empty()))
    }

    /// Stores `value`; an empty value removes the preference.
    pub fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        if value.is_empty() {
            self.storage.remove(key)
        } else {
            self.storage.set(key, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token").unwrap(), None);
        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_preferences_empty_value_clears() {
        let prefs = Preferences::new(MemoryStorage::new());
        prefs.set("theme", "dark").unwrap();
        assert_eq!(prefs.get("theme").unwrap().as_deref(), Some("dark"));
        prefs.set("theme", "").unwrap();
        assert_eq!(prefs.get("theme").unwrap(), None);
    }
}
