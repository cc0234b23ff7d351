//! Axum WebSocket upgrade handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, Path, State};
use axum::response::IntoResponse;

use super::connection::{reject_connection, run_connection};
use crate::app_state::AppState;

/// `GET /api/ws/{token}`: Upgrade to a WebSocket registered under the
/// token's user.
///
/// An invalid token still completes the upgrade, then is closed with code
/// 1008 (policy violation) and never reaches the registry.
pub async fn ws_token_handler(
    ws: WebSocketUpgrade,
    Path(token): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let identity = state.user_service.resolve_identity(&token);
    let registry = Arc::clone(&state.registry);

    ws.on_upgrade(move |socket| async move {
        match identity {
            Some(user_id) => run_connection(socket, peer, registry, Some(user_id)).await,
            None => reject_connection(socket, peer).await,
        }
    })
}

/// `GET /api/ws`: Upgrade to an anonymous WebSocket.
pub async fn ws_anonymous_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let registry = Arc::clone(&state.registry);
    ws.on_upgrade(move |socket| run_connection(socket, peer, registry, None))
}
