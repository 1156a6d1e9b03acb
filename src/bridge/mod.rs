//! Query bridge — one question in, one backend reply out.
//!
//! DESIGN
//! ======
//! `ask` issues exactly one `POST` per call and never retries. The bridge
//! holds no per-call state, so any number of `ask` futures may be in flight
//! at once; each one resolves to its own result.
//!
//! Classification order matches what the backend can actually send:
//! transport failure, then non-2xx status, then body shape, then an empty
//! `response` field.

pub mod types;

use std::time::Duration;

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;

pub use types::QueryError;
use types::{QueryReply, QueryRequest, SESSION_ID};

use crate::config::BridgeTimeouts;

// =============================================================================
// TRAIT
// =============================================================================

/// Async seam over the backend call. Enables mocking in tests.
#[async_trait::async_trait]
pub trait QueryBridge: Send + Sync {
    /// Send `text` to `endpoint` and return the backend's reply.
    async fn ask(&self, text: &str, endpoint: &Url) -> Result<String, QueryError>;
}

// =============================================================================
// HTTP BRIDGE
// =============================================================================

/// `reqwest`-backed bridge. The client is built once; the endpoint is
/// supplied per call.
pub struct HttpBridge {
    http: reqwest::Client,
}

impl HttpBridge {
    /// Build the HTTP client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::HttpClientBuild`] if the TLS backend or client
    /// configuration cannot be initialized.
    pub fn new(timeouts: BridgeTimeouts) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| QueryError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl QueryBridge for HttpBridge {
    async fn ask(&self, text: &str, endpoint: &Url) -> Result<String, QueryError> {
        let body = QueryRequest { session_id: SESSION_ID, question: text };
        let response = self
            .http
            .post(endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        parse_reply(status.as_u16(), &text)
    }
}

/// Classify a completed HTTP exchange.
///
/// # Errors
///
/// Returns [`QueryError::Backend`] for non-2xx statuses,
/// [`QueryError::Parse`] for bodies that are not a JSON object or carry a
/// non-string `response`, and
/// [`QueryError::EmptyReply`] when the envelope carries no reply.
pub fn parse_reply(status: u16, body: &str) -> Result<String, QueryError> {
    if !(200..300).contains(&status) {
        return Err(QueryError::Backend { status, body: body.to_string() });
    }
    QueryReply::from_body(body)?.into_reply()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
