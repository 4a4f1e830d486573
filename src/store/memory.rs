use super::KeyValueStore;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// In-memory store, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        debug!("Store PUT for key: {}", key);
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(key);
        debug!("Store REMOVE for key: {}", key);
        Ok(())
    }
}
