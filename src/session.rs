//! Panel session — one open chat panel and its conversation snapshot.
//!
//! DESIGN
//! ======
//! A session is created when the panel's socket connects and dropped when it
//! closes. It owns the History snapshot and handles to the store, bridge and
//! endpoint source; handlers receive it explicitly.
//!
//! Submitting a question yields a self-contained future that carries its own
//! `PendingQuery`. The owner polls any number of them concurrently and feeds
//! each finished `Exchange` back through `complete`, which is the only place
//! History changes. A result therefore always pairs with the text that
//! produced it, whatever order the backend answers in.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::bridge::{QueryBridge, QueryError};
use crate::config::EndpointSource;
use crate::history::{self, HistoryError, KeyValueStore, Turn};
use crate::message::PanelEvent;
use crate::state::AppState;

/// A submitted question waiting for its answer. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub text: String,
}

/// A finished exchange: the question and what the bridge returned for it.
#[derive(Debug)]
pub struct Exchange {
    pub query: PendingQuery,
    pub result: Result<String, QueryError>,
}

pub struct PanelSession {
    id: Uuid,
    history: Vec<Turn>,
    store: Arc<dyn KeyValueStore>,
    bridge: Arc<dyn QueryBridge>,
    endpoints: Arc<dyn EndpointSource>,
    history_lock: Arc<Mutex<()>>,
}

impl PanelSession {
    /// Open a session over the stored conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored history cannot be read or decoded.
    pub async fn open(state: &AppState) -> Result<Self, HistoryError> {
        let history = history::load_history(state.store.as_ref()).await?;
        let id = Uuid::new_v4();
        info!(session_id = %id, turns = history.len(), "panel: session opened");
        Ok(Self {
            id,
            history,
            store: state.store.clone(),
            bridge: state.bridge.clone(),
            endpoints: state.endpoints.clone(),
            history_lock: state.history_lock.clone(),
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Start one exchange. Returns `None` for blank input.
    ///
    /// The endpoint is resolved inside the returned future, so each question
    /// sees the configuration current at the time it is sent.
    #[must_use]
    pub fn submit(&self, text: String) -> Option<BoxFuture<'static, Exchange>> {
        if text.trim().is_empty() {
            warn!(session_id = %self.id, "panel: rejected blank query");
            return None;
        }
        let bridge = self.bridge.clone();
        let endpoints = self.endpoints.clone();
        let session_id = self.id;
        Some(
            async move {
                let result = match endpoints.resolve().await {
                    Ok(endpoint) => {
                        info!(%session_id, %endpoint, chars = text.chars().count(), "panel: sending query");
                        bridge.ask(&text, &endpoint).await
                    }
                    Err(e) => Err(e),
                };
                Exchange { query: PendingQuery { text }, result }
            }
            .boxed(),
        )
    }

    /// Apply a finished exchange and produce the event for the page.
    ///
    /// Success re-reads the stored conversation, appends the Turn and writes
    /// it back under the shared history lock, so turns persisted by another
    /// panel are kept. If the re-read fails, this session's snapshot is the
    /// base. A failed write is logged; the reply is still shown and the turn
    /// stays in the snapshot. Failures never touch History.
    pub async fn complete(&mut self, exchange: Exchange) -> PanelEvent {
        let Exchange { query, result } = exchange;
        match result {
            Ok(reply) => {
                let turn = Turn::new(query.text.clone(), reply.clone());
                let _guard = self.history_lock.lock().await;
                let base = match history::load_history(self.store.as_ref()).await {
                    Ok(stored) => stored,
                    Err(e) => {
                        warn!(session_id = %self.id, error = %e, "panel: history reload failed, using snapshot");
                        std::mem::take(&mut self.history)
                    }
                };
                let next = history::append_turn(&base, turn);
                if let Err(e) = history::save_history(self.store.as_ref(), &next).await {
                    error!(session_id = %self.id, error = %e, "panel: history write failed");
                }
                self.history = next;
                PanelEvent::reply(query.text, reply)
            }
            Err(e) => {
                warn!(session_id = %self.id, code = e.code(), error = %e, "panel: query failed");
                PanelEvent::failure(query.text, &e.to_string())
            }
        }
    }

    /// Submit and wait for a single question.
    pub async fn ask(&mut self, text: String) -> Option<PanelEvent> {
        let exchange = self.submit(text)?.await;
        Some(self.complete(exchange).await)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
