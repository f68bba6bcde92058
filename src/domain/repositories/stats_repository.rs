//! Repository trait for read-only reporting aggregates.
//!
//! The core exposes links queryable by `status` and audit records queryable
//! by `result`; all aggregation happens in SQL, none in the services.

use crate::domain::entities::{AccessAuditRecord, AccessResult};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Link counts grouped by lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStatusCounts {
    pub active: i64,
    pub expired: i64,
    pub revoked: i64,
}

/// Totals over the audit trail.
///
/// `expired` counts denials whose audit result is `EXPIRED`;
/// `unique_origins` counts distinct recorded client addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessSummary {
    pub total: i64,
    pub success: i64,
    pub failed: i64,
    pub expired: i64,
    pub unique_origins: i64,
}

/// Denial count for one audit result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCount {
    pub result: AccessResult,
    pub count: i64,
}

/// Access count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Access count for one hour of the day (0-23).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyCount {
    pub hour: i32,
    pub count: i64,
}

/// Successful-access count for one short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLink {
    pub short_code: String,
    pub access_count: i64,
}

/// Password-denial count for one short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityExceptionCount {
    pub short_code: String,
    pub count: i64,
}

/// Read-only reporting queries over links and the audit trail.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Counts links grouped by status.
    async fn link_status_counts(&self) -> Result<LinkStatusCounts, AppError>;

    /// Totals the audit trail: all attempts, successes, and failures.
    async fn access_summary(&self) -> Result<AccessSummary, AppError>;

    /// Counts denied attempts grouped by audit result.
    async fn failures_by_result(&self) -> Result<Vec<ResultCount>, AppError>;

    /// Counts accesses per calendar day, ascending.
    async fn daily_accesses(&self) -> Result<Vec<DailyCount>, AppError>;

    /// Counts accesses per hour of the day, ascending by hour.
    async fn hourly_accesses(&self) -> Result<Vec<HourlyCount>, AppError>;

    /// The most successfully accessed codes, descending, capped at `limit`.
    async fn top_links(&self, limit: i64) -> Result<Vec<TopLink>, AppError>;

    /// Codes with the most password denials, descending, capped at `limit`.
    async fn security_exceptions(&self, limit: i64)
        -> Result<Vec<SecurityExceptionCount>, AppError>;

    /// The most recent audit rows for one code, newest first, capped at
    /// `limit`.
    async fn recent_accesses(
        &self,
        short_code: &str,
        limit: i64,
    ) -> Result<Vec<AccessAuditRecord>, AppError>;
}
