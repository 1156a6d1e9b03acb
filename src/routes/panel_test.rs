use super::*;
use crate::history::{HISTORY_KEY, Turn, save_history};
use crate::state::test_helpers;

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn open_chat_renders_stored_turns() {
    let state = test_helpers::test_app_state();
    save_history(state.store.as_ref(), &[Turn::new("stored question", "stored <answer>")])
        .await
        .unwrap();

    let response = open_chat(State(state)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("stored question"));
    assert!(body.contains("stored &lt;answer&gt;"));
}

#[tokio::test]
async fn open_chat_with_no_history_matches_empty_render() {
    let state = test_helpers::test_app_state();
    let body = body_text(open_chat(State(state)).await).await;
    assert_eq!(body, render::render(&[]));
}

#[tokio::test]
async fn open_chat_corrupt_history_is_500() {
    let state = test_helpers::test_app_state();
    state
        .store
        .put(HISTORY_KEY, serde_json::json!(42))
        .await
        .unwrap();

    let response = open_chat(State(state)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
