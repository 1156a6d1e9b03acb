//! Process configuration and backend endpoint resolution.
//!
//! DESIGN
//! ======
//! Process-level settings (bind address, store path, timeouts) are parsed
//! once at startup by `clap`, with environment fallbacks. The backend
//! endpoint is different: it is resolved through [`EndpointSource`] on every
//! question so that editing the settings file takes effect without a restart.

use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;
use serde_json::Value;

use crate::bridge::QueryError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/query";
pub const BACKEND_URL_SETTING: &str = "aiAssistant.backendUrl";
pub const BACKEND_URL_ENV: &str = "ASSISTANT_BACKEND_URL";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// PROCESS CONFIG
// =============================================================================

#[derive(Parser, Debug, Clone)]
#[command(name = "ai-assistant-panel", about = "Local AI assistant chat panel")]
pub struct PanelConfig {
    #[arg(long, env = "ASSISTANT_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    #[arg(long, env = "ASSISTANT_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Host key/value file holding the conversation history.
    #[arg(long, env = "ASSISTANT_STORE_PATH", default_value = "assistant-state.json")]
    pub store_path: PathBuf,

    /// Settings file re-read before every question.
    #[arg(long, env = "ASSISTANT_SETTINGS_PATH", default_value = "assistant-settings.json")]
    pub settings_path: PathBuf,

    #[arg(long, env = "ASSISTANT_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "ASSISTANT_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,
}

impl PanelConfig {
    #[must_use]
    pub fn timeouts(&self) -> BridgeTimeouts {
        BridgeTimeouts { request_secs: self.request_timeout_secs, connect_secs: self.connect_timeout_secs }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

// =============================================================================
// ENDPOINT SOURCE
// =============================================================================

/// Resolves the backend URL. Called once per question, never cached.
#[async_trait::async_trait]
pub trait EndpointSource: Send + Sync {
    async fn resolve(&self) -> Result<Url, QueryError>;
}

/// A fixed endpoint, for tests and embedding.
pub struct FixedEndpoint(pub Url);

#[async_trait::async_trait]
impl EndpointSource for FixedEndpoint {
    async fn resolve(&self) -> Result<Url, QueryError> {
        Ok(self.0.clone())
    }
}

/// Reads `aiAssistant.backendUrl` from a JSON settings file, falling back to
/// an environment variable and then to [`DEFAULT_BACKEND_URL`].
///
/// A missing file is treated as "not set". Malformed JSON is an error.
pub struct SettingsFile {
    path: PathBuf,
    fallback_env: String,
}

impl SettingsFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path, fallback_env: BACKEND_URL_ENV.to_string() }
    }

    /// Override the environment variable consulted when the file has no value.
    #[must_use]
    pub fn with_fallback_env(mut self, var: &str) -> Self {
        self.fallback_env = var.to_string();
        self
    }

    async fn read_setting(&self) -> Result<Option<String>, QueryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(QueryError::Config(format!("read {}: {e}", self.path.display()))),
        };
        let settings: serde_json::Map<String, Value> = serde_json::from_slice(&bytes)
            .map_err(|e| QueryError::Config(format!("parse {}: {e}", self.path.display())))?;

        match settings.get(BACKEND_URL_SETTING) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(other) => Err(QueryError::Config(format!("{BACKEND_URL_SETTING} must be a string, got {other}"))),
        }
    }
}

#[async_trait::async_trait]
impl EndpointSource for SettingsFile {
    async fn resolve(&self) -> Result<Url, QueryError> {
        let raw = match self.read_setting().await? {
            Some(url) => url,
            None => std::env::var(&self.fallback_env)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        };
        parse_endpoint(&raw)
    }
}

/// Parse and validate a backend URL. Only `http` and `https` are accepted.
///
/// # Errors
///
/// Returns [`QueryError::Config`] if the URL is malformed or uses another scheme.
pub fn parse_endpoint(raw: &str) -> Result<Url, QueryError> {
    let url = Url::parse(raw.trim()).map_err(|e| QueryError::Config(format!("invalid backend URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(QueryError::Config(format!("unsupported backend URL scheme '{other}'"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
