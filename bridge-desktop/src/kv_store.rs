//! In-memory key-value store.
//!
//! Stand-in for the browser-local storage the hosted client uses: same
//! contract, process-lifetime persistence. Useful for demos and as the
//! default store in tests.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::storage::KeyValueStore;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Thread-safe in-memory [`KeyValueStore`].
#[derive(Default)]
pub struct MemoryKeyValueStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.data.lock().await.remove(key);
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.data.lock().await.clear();
        Ok(())
    }
}
