// ============================
// chatd-backend-lib/tests/messages_flow.rs
// ============================
//! Message routing through the real router: persistence, history, and
//! presence-based live push.
mod common;

use axum::http::StatusCode;
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use chatd_common::ServerEvent;
use common::{body_json, request, signup, spawn_app};

#[tokio::test]
async fn send_persists_and_both_histories_agree() {
    let harness = spawn_app();
    let (ada_cookie, ada) = signup(&harness.app, "Ada", "ada@example.com", "hunter22").await;
    let (bob_cookie, bob) = signup(&harness.app, "Bob", "bob@example.com", "hunter22").await;
    let ada_id = ada["id"].as_str().unwrap().to_string();
    let bob_id = bob["id"].as_str().unwrap().to_string();

    let response = request(
        &harness.app,
        "POST",
        &format!("/api/messages/{bob_id}"),
        Some(json!({ "text": "hi" })),
        Some(&ada_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sent = body_json(response).await;
    assert_eq!(sent["text"], "hi");
    assert_eq!(sent["senderId"].as_str().unwrap(), ada_id);
    assert_eq!(sent["receiverId"].as_str().unwrap(), bob_id);

    for (cookie, peer) in [(&ada_cookie, &bob_id), (&bob_cookie, &ada_id)] {
        let history = request(
            &harness.app,
            "GET",
            &format!("/api/messages/{peer}"),
            None,
            Some(cookie),
        )
        .await;
        assert_eq!(history.status(), StatusCode::OK);
        let body = body_json(history).await;
        let messages = body.as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["id"], sent["id"]);
        assert_eq!(messages[0]["senderId"].as_str().unwrap(), ada_id);
    }
}

#[tokio::test]
async fn history_preserves_creation_order() {
    let harness = spawn_app();
    let (ada_cookie, _ada) = signup(&harness.app, "Ada", "ada@example.com", "hunter22").await;
    let (bob_cookie, bob) = signup(&harness.app, "Bob", "bob@example.com", "hunter22").await;
    let bob_id = bob["id"].as_str().unwrap().to_string();

    for text in ["one", "two", "three"] {
        let response = request(
            &harness.app,
            "POST",
            &format!("/api/messages/{bob_id}"),
            Some(json!({ "text": text })),
            Some(&ada_cookie),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let ada_id = {
        let check = request(&harness.app, "GET", "/api/auth/check", None, Some(&ada_cookie)).await;
        body_json(check).await["id"].as_str().unwrap().to_string()
    };
    let history = request(
        &harness.app,
        "GET",
        &format!("/api/messages/{ada_id}"),
        None,
        Some(&bob_cookie),
    )
    .await;
    let body = body_json(history).await;
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn connected_recipient_gets_live_push_before_send_returns() {
    let harness = spawn_app();
    let (ada_cookie, _ada) = signup(&harness.app, "Ada", "ada@example.com", "hunter22").await;
    let (_bob_cookie, bob) = signup(&harness.app, "Bob", "bob@example.com", "hunter22").await;
    let bob_id: Uuid = bob["id"].as_str().unwrap().parse().unwrap();

    // Stand in for Bob's WebSocket connection.
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(8);
    harness.state.presence.register(bob_id, tx);

    let response = request(
        &harness.app,
        "POST",
        &format!("/api/messages/{bob_id}"),
        Some(json!({ "text": "hi" })),
        Some(&ada_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sent = body_json(response).await;

    // The push was enqueued before send returned.
    let event = rx.try_recv().expect("push should have fired");
    let ServerEvent::NewMessage { message } = event;
    assert_eq!(message.id.to_string(), sent["id"].as_str().unwrap());
    assert_eq!(message.text.as_deref(), Some("hi"));
}

#[tokio::test]
async fn offline_recipient_still_gets_durable_message() {
    let harness = spawn_app();
    let (ada_cookie, _ada) = signup(&harness.app, "Ada", "ada@example.com", "hunter22").await;
    let (bob_cookie, bob) = signup(&harness.app, "Bob", "bob@example.com", "hunter22").await;
    let bob_id = bob["id"].as_str().unwrap().to_string();

    // nobody registered in presence
    assert_eq!(harness.state.presence.online_count(), 0);

    let response = request(
        &harness.app,
        "POST",
        &format!("/api/messages/{bob_id}"),
        Some(json!({ "text": "catch up later" })),
        Some(&ada_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let ada_id = {
        let check = request(&harness.app, "GET", "/api/auth/check", None, Some(&ada_cookie)).await;
        body_json(check).await["id"].as_str().unwrap().to_string()
    };
    let history = request(
        &harness.app,
        "GET",
        &format!("/api/messages/{ada_id}"),
        None,
        Some(&bob_cookie),
    )
    .await;
    let body = body_json(history).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn dead_channel_does_not_fail_the_send() {
    let harness = spawn_app();
    let (ada_cookie, _ada) = signup(&harness.app, "Ada", "ada@example.com", "hunter22").await;
    let (_bob_cookie, bob) = signup(&harness.app, "Bob", "bob@example.com", "hunter22").await;
    let bob_id: Uuid = bob["id"].as_str().unwrap().parse().unwrap();

    // Register a handle whose receiver is already gone.
    let (tx, rx) = mpsc::channel::<ServerEvent>(1);
    drop(rx);
    harness.state.presence.register(bob_id, tx);

    let response = request(
        &harness.app,
        "POST",
        &format!("/api/messages/{bob_id}"),
        Some(json!({ "text": "hello?" })),
        Some(&ada_cookie),
    )
    .await;

    // push failure is swallowed; persistence already happened
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn empty_message_is_permitted() {
    let harness = spawn_app();
    let (ada_cookie, _ada) = signup(&harness.app, "Ada", "ada@example.com", "hunter22").await;
    let (_bob_cookie, bob) = signup(&harness.app, "Bob", "bob@example.com", "hunter22").await;
    let bob_id = bob["id"].as_str().unwrap().to_string();

    let response = request(
        &harness.app,
        "POST",
        &format!("/api/messages/{bob_id}"),
        Some(json!({})),
        Some(&ada_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body.get("text").is_none());
    assert!(body.get("image").is_none());
}

#[tokio::test]
async fn sidebar_lists_everyone_else() {
    let harness = spawn_app();
    let (ada_cookie, _ada) = signup(&harness.app, "Ada", "ada@example.com", "hunter22").await;
    signup(&harness.app, "Bob", "bob@example.com", "hunter22").await;
    signup(&harness.app, "Cal", "cal@example.com", "hunter22").await;

    let response = request(
        &harness.app,
        "GET",
        "/api/messages/users",
        None,
        Some(&ada_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        assert_ne!(user["email"], "ada@example.com");
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
    }
}

#[tokio::test]
async fn message_endpoints_require_auth() {
    let harness = spawn_app();
    let peer = Uuid::new_v4();

    let listing = request(&harness.app, "GET", "/api/messages/users", None, None).await;
    assert_eq!(listing.status(), StatusCode::UNAUTHORIZED);

    let send = request(
        &harness.app,
        "POST",
        &format!("/api/messages/{peer}"),
        Some(json!({ "text": "hi" })),
        None,
    )
    .await;
    assert_eq!(send.status(), StatusCode::UNAUTHORIZED);
}
