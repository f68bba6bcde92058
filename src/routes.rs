//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /l/{short_code}` - Resolve a link (public)
//! - `DELETE /l/{short_code}` - Revoke a link (public)
//! - `GET    /health`         - Health check: DB, storage, sweeper (public)
//! - `/api/*`                 - Management API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, resolve_handler, revoke_link_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::api_routes().layer(rate_limit::secure_layer());

    let router = Router::new()
        .route(
            "/l/{short_code}",
            get(resolve_handler)
                .delete(revoke_link_handler)
                .layer(rate_limit::layer()),
        )
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
