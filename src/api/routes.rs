//! Management API route configuration.

use crate::api::handlers::stats::{
    access_daily_handler, access_failures_handler, access_hourly_handler, access_summary_handler,
    link_stats_handler, recent_accesses_handler, security_exceptions_handler, top_links_handler,
};
use crate::api::handlers::{create_link_handler, upload_link_handler};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Management API routes.
///
/// # Endpoints
///
/// - `POST /links`                 - Create a redirect link
/// - `POST /links/upload`          - Upload a file and create a download link
/// - `GET  /stats/links`           - Link counts by status
/// - `GET  /stats/links/top`       - Most-resolved links
/// - `GET  /stats/access/summary`  - Access totals and success ratio
/// - `GET  /stats/access/failures` - Denials grouped by reason
/// - `GET  /stats/access/daily`    - Accesses per day
/// - `GET  /stats/access/hourly`   - Accesses per hour of day
/// - `GET  /stats/access/{short_code}` - Audit history for one code
/// - `GET  /stats/security/exceptions` - Codes with the most password denials
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/links/upload", post(upload_link_handler))
        .route("/stats/links", get(link_stats_handler))
        .route("/stats/links/top", get(top_links_handler))
        .route("/stats/access/summary", get(access_summary_handler))
        .route("/stats/access/failures", get(access_failures_handler))
        .route("/stats/access/daily", get(access_daily_handler))
        .route("/stats/access/hourly", get(access_hourly_handler))
        .route("/stats/access/{short_code}", get(recent_accesses_handler))
        .route("/stats/security/exceptions", get(security_exceptions_handler))
}
