use super::*;
use crate::history::{Turn, load_history, save_history};
use crate::state::test_helpers::temp_path;
use serde_json::json;

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let store = JsonFileStore::new(temp_path("store-missing"));
    assert_eq!(store.get("chatHistory").await.unwrap(), None);
}

#[tokio::test]
async fn put_then_get_round_trips_through_disk() {
    let path = temp_path("store-put");
    let store = JsonFileStore::new(&path);
    store.put("k", json!({ "n": 1 })).await.unwrap();

    let reopened = JsonFileStore::new(&path);
    assert_eq!(reopened.get("k").await.unwrap(), Some(json!({ "n": 1 })));
    assert!(!reopened.temp_path().exists());
    let _ = tokio::fs::remove_file(path).await;
}

#[tokio::test]
async fn put_keeps_other_keys() {
    let path = temp_path("store-keys");
    let store = JsonFileStore::new(&path);
    store.put("a", json!(1)).await.unwrap();
    store.put("b", json!(2)).await.unwrap();
    store.put("a", json!(3)).await.unwrap();

    assert_eq!(store.get("a").await.unwrap(), Some(json!(3)));
    assert_eq!(store.get("b").await.unwrap(), Some(json!(2)));
    let _ = tokio::fs::remove_file(path).await;
}

#[tokio::test]
async fn put_creates_parent_directories() {
    let dir = temp_path("store-dir");
    let path = dir.join("nested").join("state.json");
    let store = JsonFileStore::new(&path);
    store.put("k", json!("v")).await.unwrap();
    assert!(path.exists());
    let _ = tokio::fs::remove_dir_all(dir).await;
}

#[tokio::test]
async fn corrupt_file_is_reported() {
    let path = temp_path("store-corrupt");
    tokio::fs::write(&path, "[not, json").await.unwrap();
    let store = JsonFileStore::new(&path);
    assert!(matches!(store.get("k").await, Err(HistoryError::Corrupt(_))));
    let _ = tokio::fs::remove_file(path).await;
}

#[tokio::test]
async fn blank_file_reads_as_empty() {
    let path = temp_path("store-blank");
    tokio::fs::write(&path, "  \n").await.unwrap();
    let store = JsonFileStore::new(&path);
    assert_eq!(store.get("k").await.unwrap(), None);
    let _ = tokio::fs::remove_file(path).await;
}

#[tokio::test]
async fn history_survives_reopen() {
    let path = temp_path("store-history");
    let history = vec![Turn::new("first", "one"), Turn::new("second", "two")];
    save_history(&JsonFileStore::new(&path), &history).await.unwrap();

    let loaded = load_history(&JsonFileStore::new(&path)).await.unwrap();
    assert_eq!(loaded, history);
    let _ = tokio::fs::remove_file(path).await;
}
