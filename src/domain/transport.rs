//! Send side of a live client connection.
//!
//! The [`super::ConnectionRegistry`] is generic over [`Transport`] so the
//! fan-out logic does not depend on axum. The WebSocket implementation lives
//! in [`crate::ws::transport`].

use std::future::Future;

/// Failure to deliver a payload to one connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer has already gone away.
    #[error("connection closed")]
    Closed,

    /// The underlying socket rejected the frame.
    #[error("send failed: {0}")]
    Send(String),
}

/// Outbound half of a bidirectional client channel.
pub trait Transport: Send + Sync + 'static {
    /// Sends `payload` to the peer as a single text message.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the payload could not be written.
    fn send(&self, payload: &str) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Shuts the channel down after the registry has evicted it.
    ///
    /// The peer's receive side should observe the close and finish, so an
    /// evicted client does not linger connected but unregistered.
    fn close(&self) -> impl Future<Output = ()> + Send;

    /// Describes the remote end for log output.
    fn peer(&self) -> String;
}
