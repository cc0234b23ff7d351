//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::UserService;
use crate::ws::WsRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// User service for all account logic.
    pub user_service: Arc<UserService>,
    /// Registry of live WebSocket connections.
    pub registry: Arc<WsRegistry>,
}

impl AppState {
    /// Bundles a user service with the registry it broadcasts through.
    #[must_use]
    pub fn new(user_service: Arc<UserService>) -> Self {
        let registry = Arc::clone(user_service.registry());
        Self {
            user_service,
            registry,
        }
    }
}
