use std::sync::Arc;

use ai_assistant_panel::{bridge, config, history, routes, state};
use clap::Parser;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cfg = config::PanelConfig::parse();

    let bridge = bridge::HttpBridge::new(cfg.timeouts()).expect("HTTP client init failed");
    let store = history::JsonFileStore::new(cfg.store_path.clone());
    let endpoints = config::SettingsFile::new(cfg.settings_path.clone());
    tracing::info!(
        store = %store.path().display(),
        settings = %cfg.settings_path.display(),
        "history store and settings configured"
    );

    let state = state::AppState::new(Arc::new(store), Arc::new(bridge), Arc::new(endpoints));

    let app = routes::app(state);
    let addr = format!("{}:{}", cfg.bind, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "ai assistant panel listening; open /chat");
    axum::serve(listener, app).await.expect("server failed");
}
