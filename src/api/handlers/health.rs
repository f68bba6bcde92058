//! Handler for health check endpoint.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Duration;

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::infrastructure::storage::FileStore;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: round-trip query on the pool
/// 2. **Storage**: upload directory exists and is writable
/// 3. **Sweeper**: last sweep finished within twice the configured interval
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let storage_check = check_storage(&state);
    let sweeper_check = check_sweeper(&state);

    let all_healthy = db_check.is_ok() && storage_check.is_ok() && sweeper_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            storage: storage_check,
            sweeper: sweeper_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn check_storage(state: &AppState) -> CheckStatus {
    if state.file_store.is_writable() {
        CheckStatus::ok("Writable")
    } else {
        CheckStatus::error("Storage directory is not writable")
    }
}

/// The sweeper is judged stale when it has not completed a run within
/// twice its configured interval.
fn check_sweeper(state: &AppState) -> CheckStatus {
    let max_delay = Duration::seconds(2 * state.sweep_interval_seconds as i64);

    if state.sweeper_status.is_stale(max_delay) {
        match state.sweeper_status.last_run() {
            Some(at) => CheckStatus::error(format!("Last sweep at {}", at.to_rfc3339())),
            None => CheckStatus::error("Sweeper has not run yet"),
        }
    } else {
        CheckStatus::ok("Running")
    }
}
