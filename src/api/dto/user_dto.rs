//! Account DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for `POST /api/register`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Email address for the new account.
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
    /// Plain-text password; minimum length is configured server-side.
    pub password: String,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Account email address.
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Response body for `POST /api/login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed session token; also used as the WebSocket path segment.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    /// Wraps a freshly issued token.
    #[must_use]
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
