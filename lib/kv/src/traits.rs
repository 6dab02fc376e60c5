use crate::error::StoreError;

/// Durable local key-value storage for small client-side state — session
/// snapshots, cached context data.
///
/// Keys follow a namespaced convention: `auth:session`, `cache:partner:42`.
/// Values are opaque bytes; callers own the serialization.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Set a key-value pair, replacing any existing value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}
