//! WebSocket layer: upgrade handlers, receive loop, and the socket
//! [`Transport`](crate::domain::Transport).
//!
//! Authenticated clients connect to `/api/ws/{token}`, anonymous ones to
//! `/api/ws`. The server only pushes; every frame a client sends is ignored.

pub mod connection;
pub mod handler;
pub mod transport;

use axum::Router;
use axum::routing::get;

pub use transport::WsTransport;

use crate::app_state::AppState;
use crate::domain::ConnectionRegistry;

/// Registry of live WebSocket connections.
pub type WsRegistry = ConnectionRegistry<WsTransport>;

/// WebSocket routes, nested under `/api` by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(handler::ws_anonymous_handler))
        .route("/ws/{token}", get(handler::ws_token_handler))
}
