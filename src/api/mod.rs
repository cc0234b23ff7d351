//! REST API layer: route handlers, DTOs, extractors, and router composition.
//!
//! Account and WebSocket endpoints are mounted under `/api`; the health
//! check lives at the root.

pub mod dto;
pub mod extract;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "notify-gateway"),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::RegisterRequest,
        dto::LoginRequest,
        dto::TokenResponse,
        crate::domain::User,
        crate::domain::UserId,
        crate::domain::Notification,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        handlers::system::HealthResponse,
    )),
    tags(
        (name = "Accounts", description = "Registration, login, and session lookup"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST and WebSocket endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes().merge(crate::ws::routes()))
        .merge(handlers::system::routes())
}
