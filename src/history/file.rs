//! JSON file key/value store.
//!
//! The file is a single JSON object mapping keys to values. A missing file
//! reads as an empty store. Writes are serialized by an async mutex and land
//! via write-to-temp + rename, so readers never observe a partial file.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use super::{HistoryError, KeyValueStore};

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io { path: self.path.display().to_string(), source }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn read_all(&self) -> Result<Map<String, Value>, HistoryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| HistoryError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    async fn write_all(&self, entries: &Map<String, Value>) -> Result<(), HistoryError> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(|e| HistoryError::Encode(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "store: wrote file");
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, HistoryError> {
        let mut entries = self.read_all().await?;
        Ok(entries.remove(key))
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries).await
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
