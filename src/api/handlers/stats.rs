//! Handlers for the statistics endpoints.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::api::dto::stats::{
    AccessSummaryResponse, AuditRecordResponse, DailyCountResponse, FailureCountResponse,
    HourlyCountResponse, LinkStatsResponse, SecurityExceptionResponse, TopLinkResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/stats/links` - link counts by lifecycle status.
pub async fn link_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let counts = state.stats_service.link_status_counts().await?;
    Ok(Json(counts.into()))
}

/// `GET /api/stats/access/summary` - totals over the audit trail.
pub async fn access_summary_handler(
    State(state): State<AppState>,
) -> Result<Json<AccessSummaryResponse>, AppError> {
    let summary = state.stats_service.access_summary().await?;
    Ok(Json(summary.into()))
}

/// `GET /api/stats/access/failures` - denials grouped by reason.
pub async fn access_failures_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<FailureCountResponse>>, AppError> {
    let failures = state.stats_service.failures_by_result().await?;
    Ok(Json(failures.into_iter().map(Into::into).collect()))
}

/// `GET /api/stats/access/daily` - accesses per calendar day.
pub async fn access_daily_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyCountResponse>>, AppError> {
    let daily = state.stats_service.daily_accesses().await?;
    Ok(Json(daily.into_iter().map(Into::into).collect()))
}

/// `GET /api/stats/access/hourly` - accesses per hour of the day.
pub async fn access_hourly_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<HourlyCountResponse>>, AppError> {
    let hourly = state.stats_service.hourly_accesses().await?;
    Ok(Json(hourly.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// `GET /api/stats/links/top?limit=N` - most successfully resolved links.
pub async fn top_links_handler(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<TopLinkResponse>>, AppError> {
    let top = state.stats_service.top_links(query.limit).await?;
    Ok(Json(top.into_iter().map(Into::into).collect()))
}

/// `GET /api/stats/security/exceptions?limit=N` - codes with the most
/// password denials.
pub async fn security_exceptions_handler(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<SecurityExceptionResponse>>, AppError> {
    let exceptions = state.stats_service.security_exceptions(query.limit).await?;
    Ok(Json(exceptions.into_iter().map(Into::into).collect()))
}

/// `GET /api/stats/access/{short_code}?limit=N` - audit history for one
/// code, newest first.
pub async fn recent_accesses_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<AuditRecordResponse>>, AppError> {
    let records = state
        .stats_service
        .recent_accesses(&short_code, query.limit)
        .await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}
