//! Public view of a registered user.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// A registered user without credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Database identifier.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
}
