//! Persistence layer: SQLite user store.
//!
//! Request handlers reach the store through the user service; the
//! connection registry never touches it.

pub mod models;
pub mod sqlite;

pub use models::UserRecord;
pub use sqlite::SqliteUserStore;
