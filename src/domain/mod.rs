//! Domain layer: identities, notifications, and the connection registry.
//!
//! This module holds the server-side model shared by the REST and WebSocket
//! layers: user and connection identifiers, the notification record pushed
//! to clients, the [`Transport`] seam, and the [`ConnectionRegistry`] that
//! fans notifications out to live connections.

pub mod connection_id;
pub mod connection_registry;
pub mod notification;
pub mod transport;
pub mod user;
pub mod user_id;

#[cfg(test)]
pub(crate) mod testing;

pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
pub use notification::Notification;
pub use transport::{Transport, TransportError};
pub use user::User;
pub use user_id::UserId;
