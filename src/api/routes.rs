use crate::types::{AppError, Result};
use crate::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router.
///
/// CORS is restricted to the single configured origin; there is no
/// authentication on this surface.
pub fn create_router(state: AppState) -> Result<Router> {
    let origin: HeaderValue = state.config.server.cors_origin.parse().map_err(|_| {
        AppError::Configuration(format!(
            "CORS_ORIGIN is not a valid origin: {}",
            state.config.server.cors_origin
        ))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/api/ask", post(crate::api::handlers::ask::ask))
        .route("/api/health", get(crate::api::handlers::ask::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
