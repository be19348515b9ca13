//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use gather_common::{AppConfig, AppError, JwtService};
use gather_core::SnowflakeGenerator;
use gather_db::Repositories;
use gather_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application with the default middleware stack (no rate limiting)
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(health_routes());
    apply_middleware(router).with_state(state)
}

/// Build the application with rate limiting and CORS from the state's config.
/// Health routes stay outside the rate limiter.
pub fn create_app_with_config(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    let health = apply_middleware(health_routes());

    Ok(api.merge(health).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let repositories = Repositories::connect(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .repositories(repositories)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .join_codes(config.join_codes.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API_HOST/API_PORT: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app_with_config(state)?;

    run_server(app, addr).await
}
