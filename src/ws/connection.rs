//! Per-connection receive loop.
//!
//! Registers the socket with the [`WsRegistry`], drains client frames until
//! the peer goes away, then unregisters it. Client messages carry no
//! commands; they are logged and dropped.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures_util::StreamExt;

use super::{WsRegistry, WsTransport};
use crate::domain::UserId;

/// Runs a registered connection until the client disconnects.
pub async fn run_connection(
    socket: WebSocket,
    peer: SocketAddr,
    registry: Arc<WsRegistry>,
    identity: Option<UserId>,
) {
    let (ws_tx, mut ws_rx) = socket.split();
    let connection_id = registry
        .connect(WsTransport::new(ws_tx, peer), identity)
        .await;

    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                tracing::debug!(%connection_id, user_id = ?identity, text = %text.as_str(), "ws message received");
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(%connection_id, user_id = ?identity, error = %e, "ws receive failed");
                break;
            }
        }
    }

    // a broadcast may already have evicted this connection
    registry.disconnect(connection_id).await;
}

/// Closes a socket whose token did not verify, without registering it.
pub async fn reject_connection(mut socket: WebSocket, peer: SocketAddr) {
    tracing::warn!(%peer, "websocket rejected: invalid session token");
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: "invalid session token".into(),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!(%peer, error = %e, "failed to send close frame");
    }
}
