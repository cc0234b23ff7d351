//! Identifier for a single live connection.

use std::fmt;

/// Unique identifier assigned to a connection when it is registered.
///
/// Wraps a UUID v4. Several connections may share one
/// [`super::UserId`] (one per open tab), so the registry needs a key that
/// tells them apart for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId`.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
