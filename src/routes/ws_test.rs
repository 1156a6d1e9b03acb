use super::*;
use crate::history::load_history;
use crate::render::SOCKET_PATH;
use crate::state::test_helpers;
use futures::SinkExt;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_app(state: AppState) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = crate::routes::app(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: std::net::SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}{SOCKET_PATH}")).await.unwrap();
    client
}

async fn submit(client: &mut Client, text: &str) {
    let frame = json!({ "type": "submit_query", "text": text }).to_string();
    client.send(WsMessage::Text(frame.into())).await.unwrap();
}

async fn recv_event(client: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(2), client.next())
            .await
            .expect("event receive timed out")
            .expect("socket closed unexpectedly")
            .unwrap();
        if let WsMessage::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn assert_no_event(client: &mut Client) {
    assert!(
        timeout(Duration::from_millis(100), client.next()).await.is_err(),
        "expected no event"
    );
}

// =============================================================================
// accept_request
// =============================================================================

#[tokio::test]
async fn accept_request_ignores_invalid_json() {
    let state = test_helpers::test_app_state();
    let session = PanelSession::open(&state).await.unwrap();
    assert!(accept_request(&session, "not json").is_none());
    assert!(accept_request(&session, r#"{"command":"sendQuery","text":"hi"}"#).is_none());
}

#[tokio::test]
async fn accept_request_rejects_blank_query() {
    let state = test_helpers::test_app_state();
    let session = PanelSession::open(&state).await.unwrap();
    assert!(accept_request(&session, r#"{"type":"submit_query","text":"  "}"#).is_none());
}

#[tokio::test]
async fn accept_request_starts_exchange() {
    let state = test_helpers::test_app_state();
    let session = PanelSession::open(&state).await.unwrap();
    let exchange = accept_request(&session, r#"{"type":"submit_query","text":"hi"}"#)
        .unwrap()
        .await;
    assert_eq!(exchange.query.text, "hi");
    assert_eq!(exchange.result.unwrap(), "echo: hi");
}

// =============================================================================
// socket round trips
// =============================================================================

#[tokio::test]
async fn submit_query_round_trip_persists_turn() {
    let state = test_helpers::test_app_state();
    let addr = spawn_app(state.clone()).await;
    let mut client = connect(addr).await;

    submit(&mut client, "hello").await;
    let event = recv_event(&mut client).await;
    assert_eq!(
        event,
        json!({ "type": "show_result", "user_text": "hello", "ai_text": "echo: hello", "failed": false })
    );

    let history = load_history(state.store.as_ref()).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_text, "hello");
}

#[tokio::test]
async fn backend_error_is_shown_and_not_persisted() {
    let state = test_helpers::test_app_state();
    let addr = spawn_app(state.clone()).await;
    let mut client = connect(addr).await;

    submit(&mut client, "fail:oops").await;
    let event = recv_event(&mut client).await;
    assert_eq!(event["failed"], json!(true));
    assert_eq!(event["ai_text"], json!("Error: Backend error (500): oops"));
    assert!(load_history(state.store.as_ref()).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_and_blank_frames_get_no_reply() {
    let state = test_helpers::test_app_state();
    let addr = spawn_app(state).await;
    let mut client = connect(addr).await;

    client.send(WsMessage::Text("garbage".into())).await.unwrap();
    submit(&mut client, "   ").await;
    assert_no_event(&mut client).await;

    submit(&mut client, "still alive").await;
    assert_eq!(recv_event(&mut client).await["ai_text"], json!("echo: still alive"));
}

#[tokio::test]
async fn overlapping_queries_complete_out_of_order() {
    let state = test_helpers::test_app_state();
    let addr = spawn_app(state).await;
    let mut client = connect(addr).await;

    submit(&mut client, "slow:300:late").await;
    submit(&mut client, "quick").await;

    let first = recv_event(&mut client).await;
    let second = recv_event(&mut client).await;
    assert_eq!(first["user_text"], json!("quick"));
    assert_eq!(first["ai_text"], json!("echo: quick"));
    assert_eq!(second["user_text"], json!("slow:300:late"));
    assert_eq!(second["ai_text"], json!("late"));
}

#[tokio::test]
async fn reopened_panel_page_shows_previous_turns() {
    let state = test_helpers::test_app_state();
    let addr = spawn_app(state).await;
    let mut client = connect(addr).await;
    for q in ["alpha", "beta", "gamma"] {
        submit(&mut client, q).await;
        recv_event(&mut client).await;
    }
    client.close(None).await.unwrap();

    let page = reqwest::get(format!("http://{addr}/chat"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let a = page.find("echo: alpha").unwrap();
    let b = page.find("echo: beta").unwrap();
    let c = page.find("echo: gamma").unwrap();
    assert!(a < b && b < c);
}

#[tokio::test]
async fn root_redirects_to_chat_and_healthz_is_ok() {
    let addr = spawn_app(test_helpers::test_app_state()).await;
    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let root = http.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(root.status().as_u16(), 307);
    assert_eq!(root.headers()["location"], "/chat");

    let health = http.get(format!("http://{addr}/healthz")).send().await.unwrap();
    assert!(health.status().is_success());
}
