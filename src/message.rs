//! Panel messages — the closed set of frames between page and controller.
//!
//! Both directions are internally tagged JSON objects (`"type"` field), so
//! the page script and the WebSocket handler agree on one shape per variant.

use serde::{Deserialize, Serialize};

/// Page → controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelRequest {
    SubmitQuery { text: String },
}

/// Controller → page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelEvent {
    /// Result for one submitted question. `ai_text` is the reply, or
    /// `Error: <message>` when `failed` is set.
    ShowResult { user_text: String, ai_text: String, failed: bool },
}

/// Prefix distinguishing error results from replies in the panel.
pub const ERROR_PREFIX: &str = "Error: ";

impl PanelEvent {
    #[must_use]
    pub fn reply(user_text: String, ai_text: String) -> Self {
        Self::ShowResult { user_text, ai_text, failed: false }
    }

    #[must_use]
    pub fn failure(user_text: String, message: &str) -> Self {
        Self::ShowResult { user_text, ai_text: format!("{ERROR_PREFIX}{message}"), failed: true }
    }
}
