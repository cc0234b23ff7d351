//! User service: registration, login, and session resolution.

use std::sync::Arc;

use crate::auth::{TokenSigner, hash_password, verify_password};
use crate::domain::{ConnectionRegistry, Notification, Transport, User, UserId};
use crate::error::ServiceError;
use crate::persistence::SqliteUserStore;
use crate::ws::WsTransport;

/// Orchestration layer for account operations.
///
/// Owns the user store, the token signer, and a handle to the shared
/// [`ConnectionRegistry`]. Successful registrations are announced to every
/// connected client except the new user's own connections.
#[derive(Debug)]
pub struct UserService<T = WsTransport> {
    store: SqliteUserStore,
    tokens: TokenSigner,
    registry: Arc<ConnectionRegistry<T>>,
    min_password_length: usize,
}

impl<T: Transport> UserService<T> {
    /// Creates a new `UserService`.
    #[must_use]
    pub fn new(
        store: SqliteUserStore,
        tokens: TokenSigner,
        registry: Arc<ConnectionRegistry<T>>,
        min_password_length: usize,
    ) -> Self {
        Self {
            store,
            tokens,
            registry,
            min_password_length,
        }
    }

    /// Returns a reference to the shared connection registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry<T>> {
        &self.registry
    }

    /// Registers a new account and notifies connected clients.
    ///
    /// The notification is best-effort: its delivery never affects the
    /// result returned to the registering caller.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidRequest`] for a short password,
    /// [`ServiceError::EmailAlreadyRegistered`] for a taken email, or a
    /// persistence error.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        if password.chars().count() < self.min_password_length {
            return Err(ServiceError::InvalidRequest(format!(
                "password must be at least {} characters",
                self.min_password_length
            )));
        }
        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        let hashed = hash_password(password)?;
        let user_id = self.store.create_user(email, &hashed).await?;
        tracing::info!(%user_id, email, "user registered");

        match Notification::new_user(email).to_payload() {
            Ok(payload) => self.registry.broadcast(&payload, Some(user_id)).await,
            Err(e) => tracing::warn!(error = %e, "failed to serialize registration notification"),
        }

        let created = self.store.get_user_by_id(user_id).await?.ok_or_else(|| {
            ServiceError::Internal("failed to retrieve created user".to_string())
        })?;
        Ok(created.into())
    }

    /// Checks credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidCredentials`] for an unknown email or
    /// wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let Some(record) = self.store.get_user_by_email(email).await? else {
            return Err(ServiceError::InvalidCredentials);
        };
        if !verify_password(password, &record.hashed_password)? {
            tracing::info!(user_id = %record.id, "login rejected");
            return Err(ServiceError::InvalidCredentials);
        }
        tracing::info!(user_id = %record.id, "login succeeded");
        Ok(self.tokens.issue(record.id))
    }

    /// Resolves a session token to the stored user.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] if the token is invalid or the
    /// user no longer exists.
    pub async fn current_user(&self, token: &str) -> Result<User, ServiceError> {
        let user_id = self.resolve_identity(token).ok_or(ServiceError::Unauthorized)?;
        self.store
            .get_user_by_id(user_id)
            .await?
            .map(User::from)
            .ok_or(ServiceError::Unauthorized)
    }

    /// Maps a session token to the identity a WebSocket is registered under.
    ///
    /// Only the signature and age are checked; the store is not consulted.
    #[must_use]
    pub fn resolve_identity(&self, token: &str) -> Option<UserId> {
        match self.tokens.verify(token) {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                tracing::debug!(error = %e, "session token rejected");
                None
            }
        }
    }
}
