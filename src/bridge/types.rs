//! Bridge types — wire envelopes and errors for the question-answering backend.

use serde::Serialize;
use serde_json::Value;

/// Session identifier sent with every question. The backend keys its own
/// conversation state on this value; the panel never varies it.
pub const SESSION_ID: &str = "vscode";

/// Fallback detail when the backend returns no reply and no `error` field.
pub const NO_REPLY_MESSAGE: &str = "No response from AI model";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a single question/answer exchange.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The request could not be sent or the response never arrived.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend answered with a status outside the 2xx range.
    #[error("Backend error ({status}): {body}")]
    Backend { status: u16, body: String },

    /// The body parsed but carried no usable `response` field.
    #[error("AI model error: {0}")]
    EmptyReply(String),

    /// The body was not a JSON reply envelope.
    #[error("Invalid response from backend: {0}")]
    Parse(String),

    /// The backend endpoint could not be resolved from configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl QueryError {
    /// Grepable code for log lines.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Backend { .. } => "E_BACKEND",
            Self::EmptyReply(_) => "E_EMPTY_REPLY",
            Self::Parse(_) => "E_PARSE",
            Self::Config(_) => "E_CONFIG",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Request body posted to the backend.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub session_id: &'a str,
    pub question: &'a str,
}

/// Response envelope. Both fields are optional on the wire; `response`
/// takes precedence whenever it is non-empty.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct QueryReply {
    pub response: Option<String>,
    pub error: Option<String>,
}

impl QueryReply {
    /// Decode a 2xx body. The body must be a JSON object. `response`, when
    /// present and non-null, must be a string. `error` is free-form detail:
    /// strings are taken as-is, other values are kept in their JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Parse`] for invalid JSON, a non-object body, or
    /// a non-string `response`.
    pub fn from_body(body: &str) -> Result<Self, QueryError> {
        let value: Value = serde_json::from_str(body).map_err(|e| QueryError::Parse(e.to_string()))?;
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => return Err(QueryError::Parse(format!("expected a JSON object, got {}", json_kind(&other)))),
        };

        let response = match fields.remove("response") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => {
                return Err(QueryError::Parse(format!("response must be a string, got {}", json_kind(&other))));
            }
        };
        let error = match fields.remove("error") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
        };
        Ok(Self { response, error })
    }

    /// Extract the reply text, or the `EmptyReply` error describing why
    /// there is none.
    pub fn into_reply(self) -> Result<String, QueryError> {
        match self.response {
            Some(text) if !text.is_empty() => Ok(text),
            _ => {
                let detail = self
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| NO_REPLY_MESSAGE.to_string());
                Err(QueryError::EmptyReply(detail))
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
