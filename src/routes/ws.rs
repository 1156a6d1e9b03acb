//! WebSocket handler — the panel's message channel.
//!
//! DESIGN
//! ======
//! One connection is one `PanelSession`. The connection task runs a single
//! `select!` loop over:
//! - inbound page frames → `SubmitQuery` starts an exchange
//! - finished exchanges → `complete` → `ShowResult` back to the page
//!
//! Exchanges run concurrently in a `FuturesUnordered`, but History is only
//! touched from this loop, so it has exactly one writer.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → open session (loads History)
//! 2. Page sends `submit_query` → exchange pushed to the in-flight set
//! 3. Exchange finishes → session applies it → `show_result` sent
//! 4. Close → outstanding exchanges are dropped

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::message::{PanelEvent, PanelRequest};
use crate::session::{Exchange, PanelSession};
use crate::state::AppState;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let mut session = match PanelSession::open(&state).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "ws: session open failed");
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };
    let session_id = session.id();
    let mut in_flight: FuturesUnordered<BoxFuture<'static, Exchange>> = FuturesUnordered::new();

    info!(%session_id, "ws: panel connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        if let Some(exchange) = accept_request(&session, text.as_str()) {
                            in_flight.push(exchange);
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(exchange) = in_flight.next(), if !in_flight.is_empty() => {
                let event = session.complete(exchange).await;
                if send_event(&mut socket, session_id, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(%session_id, dropped = in_flight.len(), "ws: panel disconnected");
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Parse one inbound frame and start its exchange, if any.
fn accept_request(session: &PanelSession, text: &str) -> Option<BoxFuture<'static, Exchange>> {
    match serde_json::from_str::<PanelRequest>(text) {
        Ok(PanelRequest::SubmitQuery { text }) => session.submit(text),
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "ws: invalid inbound frame");
            None
        }
    }
}

async fn send_event(socket: &mut WebSocket, session_id: Uuid, event: &PanelEvent) -> Result<(), ()> {
    let json = match serde_json::to_string(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(%session_id, error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|e| {
        warn!(%session_id, error = %e, "ws: send failed");
    })
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
