//! Database models for stored users.

use crate::domain::{User, UserId};

/// A row of the `users` table, including the password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Auto-increment row ID.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// Argon2 PHC string.
    pub hashed_password: String,
}

impl From<(i64, String, String)> for UserRecord {
    fn from((id, email, hashed_password): (i64, String, String)) -> Self {
        Self {
            id: UserId::new(id),
            email,
            hashed_password,
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
        }
    }
}
