//! PostgreSQL implementation of the reporting repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{AccessAuditRecord, AccessResult};
use crate::domain::repositories::{
    AccessSummary, DailyCount, HourlyCount, LinkStatusCounts, ResultCount,
    SecurityExceptionCount, StatsRepository, TopLink,
};
use crate::error::AppError;

/// PostgreSQL reporting queries over links and the audit trail.
///
/// All aggregation happens in SQL; unknown status or result strings from
/// legacy rows are skipped rather than failing the whole report.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn link_status_counts(&self) -> Result<LinkStatusCounts, AppError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM secure_links GROUP BY status")
                .fetch_all(self.pool.as_ref())
                .await?;

        let mut counts = LinkStatusCounts::default();
        for (status, count) in rows {
            match status.as_str() {
                "ACTIVE" => counts.active = count,
                "EXPIRED" => counts.expired = count,
                "REVOKED" => counts.revoked = count,
                _ => {}
            }
        }

        Ok(counts)
    }

    async fn access_summary(&self) -> Result<AccessSummary, AppError> {
        let (total, success, expired, unique_origins): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE result = 'SUCCESS'), \
                    COUNT(*) FILTER (WHERE result = 'EXPIRED'), \
                    COUNT(DISTINCT ip_address) FILTER (WHERE ip_address IS NOT NULL) \
             FROM link_access_audit",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(AccessSummary {
            total,
            success,
            failed: total - success,
            expired,
            unique_origins,
        })
    }

    async fn failures_by_result(&self) -> Result<Vec<ResultCount>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT result, COUNT(*) \
             FROM link_access_audit \
             WHERE result <> 'SUCCESS' \
             GROUP BY result \
             ORDER BY COUNT(*) DESC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(result, count)| {
                AccessResult::parse(&result).map(|result| ResultCount { result, count })
            })
            .collect())
    }

    async fn daily_accesses(&self) -> Result<Vec<DailyCount>, AppError> {
        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            "SELECT accessed_at::date AS day, COUNT(*) \
             FROM link_access_audit \
             GROUP BY day \
             ORDER BY day",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(day, count)| DailyCount { day, count })
            .collect())
    }

    async fn hourly_accesses(&self) -> Result<Vec<HourlyCount>, AppError> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT EXTRACT(HOUR FROM accessed_at)::int AS hour, COUNT(*) \
             FROM link_access_audit \
             GROUP BY hour \
             ORDER BY hour",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(hour, count)| HourlyCount { hour, count })
            .collect())
    }

    async fn top_links(&self, limit: i64) -> Result<Vec<TopLink>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT short_code, COUNT(*) \
             FROM link_access_audit \
             WHERE result = 'SUCCESS' \
             GROUP BY short_code \
             ORDER BY COUNT(*) DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(short_code, access_count)| TopLink {
                short_code,
                access_count,
            })
            .collect())
    }

    async fn security_exceptions(
        &self,
        limit: i64,
    ) -> Result<Vec<SecurityExceptionCount>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT short_code, COUNT(*) \
             FROM link_access_audit \
             WHERE result IN ('PASSWORD_REQUIRED', 'INVALID_PASSWORD') \
             GROUP BY short_code \
             ORDER BY COUNT(*) DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(short_code, count)| SecurityExceptionCount { short_code, count })
            .collect())
    }

    async fn recent_accesses(
        &self,
        short_code: &str,
        limit: i64,
    ) -> Result<Vec<AccessAuditRecord>, AppError> {
        let rows: Vec<(Uuid, String, String, Option<String>, Option<String>, DateTime<Utc>)> =
            sqlx::query_as(
                "SELECT id, short_code, result, ip_address, user_agent, accessed_at \
                 FROM link_access_audit \
                 WHERE short_code = $1 \
                 ORDER BY accessed_at DESC \
                 LIMIT $2",
            )
            .bind(short_code)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, short_code, result, ip_address, user_agent, accessed_at)| {
                AccessResult::parse(&result).map(|result| AccessAuditRecord {
                    id,
                    short_code,
                    result,
                    ip_address,
                    user_agent,
                    accessed_at,
                })
            })
            .collect())
    }
}
