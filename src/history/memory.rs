//! In-process key/value store.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;

use super::{HistoryError, KeyValueStore};

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, HistoryError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), HistoryError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
