//! Router configuration for the API.

use std::time::Duration;

use axum::{Json, Router, middleware, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiDocument;
use utoipa_axum::router::OpenApiRouter;

use crate::api::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Collects every documented route under `/api` along with its OpenAPI
/// description.
pub fn api_router() -> (Router<AppState>, OpenApiDocument) {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/auth", handlers::auth::auth_routes())
        .nest("/api/schemas", handlers::schemas::schema_routes())
        .nest("/api", handlers::health::health_routes())
        .split_for_parts()
}

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. Request ID - generates or propagates `x-request-id`
/// 2. Logging - logs requests with the request ID
/// 3. Compression - negotiates `Accept-Encoding`
/// 4. Error handler - turns plain-text errors into `ErrorResponse` JSON
/// 5. Timeout - answers `408` once `server.request_timeout` elapses
///
/// # Routes
/// - `/api/auth/{signup,register,login}`
/// - `/api/schemas/{name}`
/// - `/api/health`, `/api/health/live`
/// - `/api/openapi.json`
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.settings.server.request_timeout);
    let (router, openapi) = api_router();

    router
        .route(
            "/api/openapi.json",
            get(move || {
                let openapi = openapi.clone();
                async move { Json(openapi) }
            }),
        )
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
