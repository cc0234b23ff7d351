//! Notifications pushed to connected WebSocket clients.
//!
//! The registry never looks inside a notification: the service serializes it
//! with [`Notification::to_payload`] and hands the resulting string to
//! [`super::ConnectionRegistry::broadcast`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Server → client notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Emitted after a user registers successfully.
    NewUser {
        /// Email address of the new user.
        email: String,
        /// Human-readable message shown by clients.
        message: String,
    },
}

impl Notification {
    /// Builds the notification announcing a newly registered user.
    #[must_use]
    pub fn new_user(email: &str) -> Self {
        Self::NewUser {
            email: email.to_string(),
            message: format!("New user registered: {email}"),
        }
    }

    /// Serializes the notification into the text frame payload.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
