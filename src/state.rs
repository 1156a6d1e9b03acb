//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the three external collaborators of a panel: the host key/value
//! store, the query bridge, and the endpoint source, plus the lock panels
//! take while appending to the stored conversation. Panel sessions clone
//! the handles they need.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::bridge::QueryBridge;
use crate::config::EndpointSource;
use crate::history::KeyValueStore;

/// Clone is required by Axum; all fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub bridge: Arc<dyn QueryBridge>,
    pub endpoints: Arc<dyn EndpointSource>,
    /// Serializes read-append-write of the stored conversation across panels.
    pub history_lock: Arc<Mutex<()>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, bridge: Arc<dyn QueryBridge>, endpoints: Arc<dyn EndpointSource>) -> Self {
        Self { store, bridge, endpoints, history_lock: Arc::new(Mutex::new(())) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
