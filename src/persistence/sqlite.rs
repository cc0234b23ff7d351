//! SQLite implementation of the user store.

use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use super::models::UserRecord;
use crate::domain::UserId;
use crate::error::ServiceError;

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (\
     id INTEGER PRIMARY KEY AUTOINCREMENT, \
     email TEXT NOT NULL UNIQUE, \
     hashed_password TEXT NOT NULL)";

/// SQLite-backed user store using `sqlx::SqlitePool`.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Creates a store on top of an existing connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool for `database_url`.
    ///
    /// Connections are kept open for the life of the pool so that
    /// `sqlite::memory:` databases survive idle periods.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError::PersistenceError`] if the database cannot
    /// be opened.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> Result<Self, ServiceError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(connect_timeout_secs))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?;
        tracing::info!(database_url, "database connection established");
        Ok(Self::new(pool))
    }

    /// Creates the `users` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError::PersistenceError`] on database failure.
    pub async fn migrate(&self) -> Result<(), ServiceError> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        tracing::info!("users table ready");
        Ok(())
    }

    /// Looks up a user by email.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError::PersistenceError`] on database failure.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ServiceError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, email, hashed_password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserRecord::from))
    }

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError::PersistenceError`] on database failure.
    pub async fn get_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, ServiceError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, email, hashed_password FROM users WHERE id = ?",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserRecord::from))
    }

    /// Inserts a user and returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::EmailAlreadyRegistered`] if the email is
    /// taken, or a [`ServiceError::PersistenceError`] on other failures.
    pub async fn create_user(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> Result<UserId, ServiceError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (email, hashed_password) VALUES (?, ?) RETURNING id",
        )
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ServiceError::EmailAlreadyRegistered
            }
            other => ServiceError::from(other),
        })?;
        Ok(UserId::new(id))
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database connection closed");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteUserStore {
        let Ok(store) = SqliteUserStore::connect("sqlite::memory:", 1, 5).await else {
            panic!("in-memory database");
        };
        let Ok(()) = store.migrate().await else {
            panic!("migration failed");
        };
        store
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let store = memory_store().await;
        let Ok(id) = store.create_user("a@example.com", "hash-a").await else {
            panic!("insert failed");
        };

        let Ok(Some(by_email)) = store.get_user_by_email("a@example.com").await else {
            panic!("lookup by email failed");
        };
        assert_eq!(by_email.id, id);
        assert_eq!(by_email.hashed_password, "hash-a");

        let Ok(Some(by_id)) = store.get_user_by_id(id).await else {
            panic!("lookup by id failed");
        };
        assert_eq!(by_id.email, "a@example.com");
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = memory_store().await;
        let (Ok(first), Ok(second)) = (
            store.create_user("a@example.com", "h").await,
            store.create_user("b@example.com", "h").await,
        ) else {
            panic!("insert failed");
        };
        assert!(first < second);
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_conflict() {
        let store = memory_store().await;
        let _ = store.create_user("dup@example.com", "h").await;
        let result = store.create_user("dup@example.com", "h2").await;
        assert!(matches!(result, Err(ServiceError::EmailAlreadyRegistered)));
    }

    #[tokio::test]
    async fn missing_rows_are_none() {
        let store = memory_store().await;
        assert!(matches!(store.get_user_by_email("nobody@example.com").await, Ok(None)));
        assert!(matches!(store.get_user_by_id(UserId::new(99)).await, Ok(None)));
    }

    #[tokio::test]
    async fn migrate_is_repeatable() {
        let store = memory_store().await;
        assert!(store.migrate().await.is_ok());
    }
}
