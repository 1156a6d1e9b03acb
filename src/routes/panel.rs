//! Open-chat command.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::{error, info};

use crate::history;
use crate::render;
use crate::state::AppState;

/// `GET /chat` — render the panel with the stored conversation.
pub async fn open_chat(State(state): State<AppState>) -> Response {
    match history::load_history(state.store.as_ref()).await {
        Ok(turns) => {
            info!(turns = turns.len(), "panel: open chat");
            Html(render::render(&turns)).into_response()
        }
        Err(e) => {
            error!(error = %e, "panel: history load failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "chat history unavailable").into_response()
        }
    }
}

#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;
