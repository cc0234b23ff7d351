//! WebSocket implementation of [`Transport`].

use std::fmt;
use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocket};
use futures_util::SinkExt;
use futures_util::stream::SplitSink;
use tokio::sync::Mutex;

use crate::domain::{Transport, TransportError};

/// Write half of an upgraded WebSocket.
///
/// The read half stays with the connection's receive loop. Sends from
/// concurrent broadcasts are serialized by the inner mutex.
pub struct WsTransport {
    sink: Mutex<SplitSink<WebSocket, Message>>,
    peer: SocketAddr,
}

impl WsTransport {
    /// Wraps the write half of a socket connected to `peer`.
    #[must_use]
    pub fn new(sink: SplitSink<WebSocket, Message>, peer: SocketAddr) -> Self {
        Self {
            sink: Mutex::new(sink),
            peer,
        }
    }
}

impl fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsTransport")
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

impl Transport for WsTransport {
    async fn send(&self, payload: &str) -> Result<(), TransportError> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(payload.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn close(&self) {
        // the peer answers the close frame, which ends its receive loop
        if let Err(e) = self.sink.lock().await.close().await {
            tracing::debug!(peer = %self.peer, error = %e, "closing evicted websocket failed");
        }
    }

    fn peer(&self) -> String {
        self.peer.to_string()
    }
}
