//! Reporting over links and the audit trail.

use std::sync::Arc;

use crate::domain::entities::AccessAuditRecord;
use crate::domain::repositories::{
    AccessSummary, DailyCount, HourlyCount, LinkStatusCounts, ResultCount,
    SecurityExceptionCount, StatsRepository, TopLink,
};
use crate::error::AppError;

const DEFAULT_TOP_LIMIT: i64 = 10;
const DEFAULT_EXCEPTION_LIMIT: i64 = 5;
const DEFAULT_RECENT_LIMIT: i64 = 20;
const MAX_TOP_LIMIT: i64 = 100;

/// Read-only statistics derived from persisted state.
pub struct StatsService<S: StatsRepository> {
    stats_repository: Arc<S>,
}

impl<S: StatsRepository> StatsService<S> {
    pub fn new(stats_repository: Arc<S>) -> Self {
        Self { stats_repository }
    }

    pub async fn link_status_counts(&self) -> Result<LinkStatusCounts, AppError> {
        self.stats_repository.link_status_counts().await
    }

    pub async fn access_summary(&self) -> Result<AccessSummary, AppError> {
        self.stats_repository.access_summary().await
    }

    pub async fn failures_by_result(&self) -> Result<Vec<ResultCount>, AppError> {
        self.stats_repository.failures_by_result().await
    }

    pub async fn daily_accesses(&self) -> Result<Vec<DailyCount>, AppError> {
        self.stats_repository.daily_accesses().await
    }

    pub async fn hourly_accesses(&self) -> Result<Vec<HourlyCount>, AppError> {
        self.stats_repository.hourly_accesses().await
    }

    /// Most-accessed links by successful resolutions, clamped to a sane
    /// limit.
    pub async fn top_links(&self, limit: Option<i64>) -> Result<Vec<TopLink>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);
        self.stats_repository.top_links(limit).await
    }

    /// Codes accumulating the most password denials.
    pub async fn security_exceptions(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<SecurityExceptionCount>, AppError> {
        let limit = limit
            .unwrap_or(DEFAULT_EXCEPTION_LIMIT)
            .clamp(1, MAX_TOP_LIMIT);
        self.stats_repository.security_exceptions(limit).await
    }

    /// Audit history for one code, newest first.
    pub async fn recent_accesses(
        &self,
        short_code: &str,
        limit: Option<i64>,
    ) -> Result<Vec<AccessAuditRecord>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, MAX_TOP_LIMIT);
        self.stats_repository.recent_accesses(short_code, limit).await
    }
}
