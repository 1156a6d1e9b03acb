//! History — conversation turns persisted in the host key/value store.
//!
//! DESIGN
//! ======
//! The host store is an external collaborator that only knows keys and JSON
//! values ([`KeyValueStore`]). The whole conversation lives under one fixed
//! key as an ordered array of `{"user", "ai"}` objects.
//!
//! `append_turn` is pure. Persisting its result is the panel session's job,
//! and it only does so after a successful exchange, so failed questions
//! never reach the store.

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Store key holding the conversation.
pub const HISTORY_KEY: &str = "chatHistory";

// =============================================================================
// TURN
// =============================================================================

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(rename = "user")]
    pub user_text: String,
    #[serde(rename = "ai")]
    pub ai_text: String,
}

impl Turn {
    #[must_use]
    pub fn new(user_text: impl Into<String>, ai_text: impl Into<String>) -> Self {
        Self { user_text: user_text.into(), ai_text: ai_text.into() }
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value is corrupt: {0}")]
    Corrupt(String),

    #[error("value could not be encoded: {0}")]
    Encode(String),
}

// =============================================================================
// STORE
// =============================================================================

/// Host key/value store. Values are arbitrary JSON.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, HistoryError>;
    async fn put(&self, key: &str, value: Value) -> Result<(), HistoryError>;
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Load the conversation. Returns an empty history when nothing is stored.
///
/// # Errors
///
/// Returns [`HistoryError::Corrupt`] if the stored value is not a turn array,
/// or any error the store itself reports.
pub async fn load_history(store: &dyn KeyValueStore) -> Result<Vec<Turn>, HistoryError> {
    match store.get(HISTORY_KEY).await? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|e| HistoryError::Corrupt(e.to_string())),
    }
}

/// Return a new history with `turn` appended.
#[must_use]
pub fn append_turn(history: &[Turn], turn: Turn) -> Vec<Turn> {
    let mut next = Vec::with_capacity(history.len() + 1);
    next.extend_from_slice(history);
    next.push(turn);
    next
}

/// Persist the whole conversation under [`HISTORY_KEY`].
///
/// # Errors
///
/// Returns an error if encoding fails or the store rejects the write.
pub async fn save_history(store: &dyn KeyValueStore, history: &[Turn]) -> Result<(), HistoryError> {
    let value = serde_json::to_value(history).map_err(|e| HistoryError::Encode(e.to_string()))?;
    store.put(HISTORY_KEY, value).await
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
