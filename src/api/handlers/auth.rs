//! Account endpoints: register, login, current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use validator::Validate;

use crate::api::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::api::extract::BearerToken;
use crate::app_state::AppState;
use crate::domain::User;
use crate::error::{ErrorResponse, ServiceError};

/// `POST /register`: Create an account and notify connected clients.
///
/// # Errors
///
/// Returns [`ServiceError`] on invalid input or an already registered email.
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Accounts",
    summary = "Register a new user",
    description = "Creates an account and broadcasts a `new_user` notification to every connected WebSocket except the new user's own.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input or email already registered", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()
        .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;
    let user = state.user_service.register(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /login`: Exchange credentials for a session token.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidCredentials`] on a wrong email or password.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Accounts",
    summary = "Log in",
    description = "Verifies the credentials and returns a signed session token.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Incorrect email or password", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()
        .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;
    let token = state.user_service.login(&req.email, &req.password).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// `GET /users/me`: Return the user behind the bearer token.
///
/// # Errors
///
/// Returns [`ServiceError::Unauthorized`] for a missing or invalid token.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Accounts",
    summary = "Current user",
    description = "Resolves the `Authorization: Bearer` token to the stored user.",
    responses(
        (status = 200, description = "Authenticated user", body = User),
        (status = 401, description = "Could not validate credentials", body = ErrorResponse),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.user_service.current_user(&token).await?;
    Ok(Json(user))
}

/// Account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/users/me", get(me))
}
