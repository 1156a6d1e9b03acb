//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! `/chat` is the open-chat command: it renders the panel with the stored
//! conversation. The page then connects to the panel socket, where every
//! question and answer travels as a typed `PanelRequest` / `PanelEvent`.

pub mod panel;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::render::SOCKET_PATH;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(redirect_root_to_chat))
        .route("/chat", get(panel::open_chat))
        .route(SOCKET_PATH, get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn redirect_root_to_chat() -> Redirect {
    Redirect::temporary("/chat")
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
