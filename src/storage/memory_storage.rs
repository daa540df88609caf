use crate::storage::errors::StorageError;
use crate::storage::KeyValueStore;
use dashmap::DashMap;
use std::sync::Arc;

/// In-process key-value store, nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    cache: Arc<DashMap<String, String>>
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(DashMap::new())
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.cache.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.cache.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
