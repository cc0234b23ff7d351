//! notify-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use notify_gateway::app_state::AppState;
use notify_gateway::auth::TokenSigner;
use notify_gateway::config::{LogFormat, ServiceConfig};
use notify_gateway::persistence::SqliteUserStore;
use notify_gateway::server;
use notify_gateway::service::UserService;
use notify_gateway::ws::WsRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    // Load configuration
    let config =
        ServiceConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    tracing::info!(addr = %config.listen_addr, "starting notify-gateway");

    // Build persistence layer
    let store = SqliteUserStore::connect(
        &config.database_url,
        config.database_max_connections,
        config.database_connect_timeout_secs,
    )
    .await
    .context("failed to open database")?;
    store.migrate().await.context("failed to create tables")?;

    // Build domain and service layers
    let registry = Arc::new(WsRegistry::new());
    let tokens = TokenSigner::new(config.secret_key.as_bytes(), config.token_max_age_secs)
        .context("invalid SECRET_KEY")?;
    let user_service = Arc::new(UserService::new(
        store.clone(),
        tokens,
        registry,
        config.min_password_length,
    ));

    let app = server::build_app(AppState::new(user_service));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    server::serve(listener, app, shutdown_signal()).await?;

    tracing::info!("shutting down");
    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
