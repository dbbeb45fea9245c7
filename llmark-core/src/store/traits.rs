use serde_json::Value;

use crate::error::StoreError;

/// The persistence seam: an async key-value store with no transaction
/// guarantees, mirroring an extension's private storage area.
///
/// `compare_and_swap` defaults to an unconditional write — last writer wins,
/// exactly the discipline of the original storage collaborator. Backends
/// that can do better override it; `BookmarkStore` only uses it under
/// [`WritePolicy::Guarded`](crate::config::WritePolicy).
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key. `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the entire value for a key.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Write `new` only if the current value still equals `expected`
    /// (`None` meaning the key is absent). Returns whether the write
    /// happened. Default: unconditional `set`, always `true`.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> Result<bool, StoreError> {
        let _ = expected;
        self.set(key, new).await?;
        Ok(true)
    }
}
