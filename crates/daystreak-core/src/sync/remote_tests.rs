//! REST remote store tests against a local mock server.

use mockito::{Matcher, Server};

use super::remote::{RemoteStore, RestRemoteStore};
use super::types::{RemoteError, SyncEnvelope};
use crate::storage::RemoteConfig;

fn store_for(server: &Server) -> RestRemoteStore {
    RestRemoteStore::new(&RemoteConfig {
        base_url: server.url(),
        namespace: "streaks".into(),
        timeout_secs: 5,
        retry_attempts: 2,
        poll_interval_secs: 1,
        enabled: true,
    })
    .unwrap()
}

#[tokio::test]
async fn read_absent_document_is_none() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/streaks/streak-abc.json")
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let store = store_for(&server);
    let found = store.read("streak-abc").await.unwrap();
    assert!(found.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn read_parses_wire_envelope() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/streaks/streak-abc.json")
        .with_status(200)
        .with_body(
            r#"{"streak":12,"lastCompleted":"2026-08-01T09:30:00Z","lastUpdated":"2026-08-01T09:30:05Z"}"#,
        )
        .create_async()
        .await;

    let store = store_for(&server);
    let envelope = store.read("streak-abc").await.unwrap().unwrap();
    assert_eq!(envelope.streak, 12);
    assert!(envelope.last_completed.is_some());
}

#[tokio::test]
async fn malformed_document_is_invalid_record_without_retry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/streaks/streak-abc.json")
        .with_status(200)
        .with_body(r#"{"bogus":true}"#)
        .expect(1)
        .create_async()
        .await;

    let store = store_for(&server);
    let err = store.read("streak-abc").await.unwrap_err();
    assert!(matches!(err, RemoteError::InvalidRecord(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn read_retries_before_reporting_unavailable() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/streaks/streak-abc.json")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let store = store_for(&server);
    assert!(store.read("streak-abc").await.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn write_puts_camel_case_document() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/streaks/streak-abc.json")
        .match_body(Matcher::PartialJsonString(r#"{"streak":3}"#.to_string()))
        .with_status(200)
        .create_async()
        .await;

    let envelope: SyncEnvelope = serde_json::from_str(
        r#"{"streak":3,"lastCompleted":"2026-08-01T09:30:00Z","lastUpdated":"2026-08-01T09:30:05Z"}"#,
    )
    .unwrap();

    let store = store_for(&server);
    store.write("streak-abc", &envelope).await.unwrap();
    mock.assert_async().await;
}
