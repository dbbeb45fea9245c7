use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::StoreError;

use super::KeyValueStore;

/// In-memory [`KeyValueStore`].
///
/// The ephemeral fallback when no persistent backend was granted, and the
/// test double everywhere else.
#[derive(Debug, Default)]
pub struct MemoryKv {
    map: Mutex<HashMap<String, Value>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.map.lock().expect("memory kv mutex poisoned")
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> Result<bool, StoreError> {
        let mut map = self.lock();
        if map.get(key) == expected {
            map.insert(key.to_string(), new);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
