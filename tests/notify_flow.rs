//! End-to-end registration notifications over real sockets.

#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use reqwest::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use common::{next_text, spawn_server};

const WAIT: Duration = Duration::from_secs(3);
const QUIET: Duration = Duration::from_millis(300);

#[tokio::test]
async fn registration_notifies_other_clients() {
    let server = spawn_server().await;
    assert_eq!(
        server.register("alice@example.com", "password1").await.status(),
        StatusCode::CREATED
    );
    let token = server.login("alice@example.com", "password1").await;

    let mut alice = server.connect_ws(&format!("/api/ws/{token}")).await;
    let mut anon = server.connect_ws("/api/ws").await;
    server.wait_for_connections(2).await;

    let resp = server.register("bob@example.com", "password1").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    for client in [&mut alice, &mut anon] {
        let Some(text) = next_text(client, WAIT).await else {
            panic!("no notification received");
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            panic!("notification is not json: {text}");
        };
        assert_eq!(value["type"], "new_user");
        assert_eq!(value["email"], "bob@example.com");
        assert_eq!(value["message"], "New user registered: bob@example.com");
    }
}

#[tokio::test]
async fn every_tab_of_existing_users_is_notified() {
    let server = spawn_server().await;
    let _ = server.register("carol@example.com", "password1").await;
    let carol_token = server.login("carol@example.com", "password1").await;
    let mut carol = server.connect_ws(&format!("/api/ws/{carol_token}")).await;
    server.wait_for_connections(1).await;

    // dave registers, then logs in and opens two tabs before erin registers
    let _ = server.register("dave@example.com", "password1").await;
    assert!(next_text(&mut carol, WAIT).await.is_some());
    let dave_token = server.login("dave@example.com", "password1").await;
    let mut dave_a = server.connect_ws(&format!("/api/ws/{dave_token}")).await;
    let mut dave_b = server.connect_ws(&format!("/api/ws/{dave_token}")).await;
    server.wait_for_connections(3).await;

    let _ = server.register("erin@example.com", "password1").await;

    // every tab of an existing identity receives erin's notification
    for client in [&mut carol, &mut dave_a, &mut dave_b] {
        let Some(text) = next_text(client, WAIT).await else {
            panic!("missing notification");
        };
        assert!(text.contains("erin@example.com"));
    }
}

#[tokio::test]
async fn invalid_token_is_closed_with_policy_violation() {
    let server = spawn_server().await;
    let mut ws = server.connect_ws("/api/ws/not-a-valid-token").await;

    let Ok(Some(Ok(frame))) = tokio::time::timeout(WAIT, ws.next()).await else {
        panic!("expected a close frame");
    };
    let Message::Close(Some(close)) = frame else {
        panic!("expected a close frame with a status code");
    };
    assert_eq!(close.code, CloseCode::Policy);
    assert_eq!(server.registry.connection_count().await, 0);
}

#[tokio::test]
async fn closed_client_is_removed_from_registry() {
    let server = spawn_server().await;
    let mut ws = server.connect_ws("/api/ws").await;
    server.wait_for_connections(1).await;

    let _ = ws.send(Message::Close(None)).await;
    server.wait_for_connections(0).await;

    // registration with nobody listening still succeeds
    assert_eq!(
        server.register("solo@example.com", "password1").await.status(),
        StatusCode::CREATED
    );
}

#[tokio::test]
async fn dropped_client_does_not_block_others() {
    let server = spawn_server().await;
    let mut keeper = server.connect_ws("/api/ws").await;
    let leaver = server.connect_ws("/api/ws").await;
    server.wait_for_connections(2).await;

    drop(leaver);
    let _ = server.register("frank@example.com", "password1").await;

    let Some(text) = next_text(&mut keeper, WAIT).await else {
        panic!("surviving client missed the notification");
    };
    assert!(text.contains("frank@example.com"));
    server.wait_for_connections(1).await;
}

#[tokio::test]
async fn client_messages_are_ignored() {
    let server = spawn_server().await;
    let mut ws = server.connect_ws("/api/ws").await;
    server.wait_for_connections(1).await;

    let _ = ws.send(Message::text("hello server")).await;
    assert_eq!(next_text(&mut ws, QUIET).await, None);
    assert_eq!(server.registry.connection_count().await, 1);
}
