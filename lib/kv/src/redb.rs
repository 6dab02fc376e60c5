use std::path::Path;

use redb::{Database, TableDefinition};

use crate::error::StoreError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

fn storage(e: impl std::fmt::Display) -> StoreError {
    StoreError::Storage(e.to_string())
}

/// [`KVStore`] backed by redb — a pure-Rust embedded key-value database.
///
/// One database file, one table. Every operation is its own transaction;
/// the snapshot-sized values this store holds don't warrant batching.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(storage)?;

        // Ensure the table exists so first reads don't fail.
        let init = db.begin_write().map_err(storage)?;
        init.open_table(TABLE).map(drop).map_err(storage)?;
        init.commit().map_err(storage)?;

        tracing::debug!("opened kv store at {}", path.display());
        Ok(Self { db })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.db.begin_read().map_err(storage)?;
        let table = txn.open_table(TABLE).map_err(storage)?;
        let value = table.get(key).map_err(storage)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = txn.open_table(TABLE).map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        txn.commit().map_err(storage)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = txn.open_table(TABLE).map_err(storage)?;
            table.remove(key).map(drop).map_err(storage)?;
        }
        txn.commit().map_err(storage)
    }
}
