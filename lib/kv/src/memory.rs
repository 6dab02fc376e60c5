use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::traits::KVStore;

/// In-memory [`KVStore`] for tests and demo mode.
///
/// Nothing survives the process; share one instance behind an `Arc` to
/// model "durable" storage across client rebuilds within a test.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
