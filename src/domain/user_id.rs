//! Type-safe user identifier.
//!
//! [`UserId`] wraps the integer primary key assigned by the user store. It is
//! the identity a WebSocket connection is registered under and the value a
//! session token resolves to.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Numeric identifier of a registered user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw database id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw database id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
