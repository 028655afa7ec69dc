//! Webhook API integration tests.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use common::{mention_annotation, message_event, BOT, ROOM_A, ROOM_B};
use rollcall::web::create_router;
use rollcall::{AppState, CommandEngine, GroupList, GroupStore};

fn create_test_server() -> TestServer {
    let state = AppState::new(GroupList::new(), CommandEngine::new(BOT));
    TestServer::new(create_router(Arc::new(state))).expect("Failed to create test server")
}

async fn send(server: &TestServer, space: &str, text: &str, users: &[(&str, &str)]) -> String {
    let response = server
        .post("/webhook")
        .json(&message_event(space, text, users))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["text"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_create_and_notify() {
    let server = create_test_server();

    let reply = send(
        &server,
        ROOM_A,
        "@rollcall create eng @Alice @Bob",
        &[("Alice", "users/1"), ("Bob", "users/2")],
    )
    .await;
    assert_eq!(reply, "Created group \"eng\" with user(s) Alice, Bob");

    let reply = send(&server, ROOM_A, "@rollcall notify eng standup now", &[]).await;
    assert_eq!(reply, "Carol said:\n\n<users/1> <users/2>  standup now");
}

#[tokio::test]
async fn test_bot_mentions_are_not_members() {
    let server = create_test_server();

    let mut event = message_event(
        ROOM_A,
        "@rollcall create eng @helper @Alice",
        &[("Alice", "users/1")],
    );
    event["message"]["annotations"]
        .as_array_mut()
        .unwrap()
        .insert(1, mention_annotation("helper", "users/9", "BOT"));

    let response = server.post("/webhook").json(&event).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["text"], "Created group \"eng\" with user(s) Alice");
}

#[tokio::test]
async fn test_private_group_hidden_from_other_rooms() {
    let server = create_test_server();

    send(&server, ROOM_A, "@rollcall create eng @Alice", &[("Alice", "users/1")]).await;
    let reply = send(&server, ROOM_A, "@rollcall restrict eng", &[]).await;
    assert!(reply.contains("private"));

    let reply = send(&server, ROOM_B, "@rollcall notify eng hello", &[]).await;
    assert!(reply.contains("may not use it"));

    let reply = send(&server, ROOM_B, "@rollcall list", &[]).await;
    assert!(reply.contains("no groups"));

    let reply = send(&server, ROOM_A, "@rollcall list", &[]).await;
    assert!(reply.contains("```eng```"));
}

#[tokio::test]
async fn test_help_reply() {
    let server = create_test_server();

    let reply = send(&server, ROOM_A, "@rollcall help", &[]).await;
    assert!(reply.starts_with("Here's what I can do:"));
    assert!(reply.contains("notify"));
}

#[tokio::test]
async fn test_added_to_space_greeting() {
    let server = create_test_server();

    let response = server
        .post("/webhook")
        .json(&json!({
            "type": "ADDED_TO_SPACE",
            "space": { "name": ROOM_A, "type": "ROOM" },
            "user": { "name": "users/3", "displayName": "Carol", "type": "HUMAN" }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["text"].as_str().unwrap().contains("@rollcall help"));
}

#[tokio::test]
async fn test_removed_from_space_has_no_text() {
    let server = create_test_server();

    let response = server
        .post("/webhook")
        .json(&json!({
            "type": "REMOVED_FROM_SPACE",
            "space": { "name": ROOM_A, "type": "ROOM" }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body.get("text").is_none());
}

#[tokio::test]
async fn test_message_event_without_message() {
    let server = create_test_server();

    let response = server
        .post("/webhook")
        .json(&json!({
            "type": "MESSAGE",
            "space": { "name": ROOM_A, "type": "ROOM" }
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_mutations_are_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("groups.json");

    let state = AppState::new(GroupList::new(), CommandEngine::new(BOT))
        .with_store(GroupStore::new(&path));
    let server = TestServer::new(create_router(Arc::new(state))).unwrap();

    send(&server, ROOM_A, "@rollcall create eng @Alice", &[("Alice", "users/1")]).await;
    send(&server, ROOM_A, "@rollcall private eng", &[]).await;

    let groups = GroupStore::new(&path).load().unwrap();
    let group = groups.get("eng").unwrap();
    assert_eq!(group.members().len(), 1);
    assert_eq!(group.privacy_room(), Some(ROOM_A));

    // Read-only commands leave the snapshot alone
    std::fs::remove_file(&path).unwrap();
    send(&server, ROOM_A, "@rollcall list eng", &[]).await;
    assert!(!path.exists());
}
