//! DTOs for the statistics endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::entities::AccessAuditRecord;
use crate::domain::repositories::{
    AccessSummary, DailyCount, HourlyCount, LinkStatusCounts, ResultCount,
    SecurityExceptionCount, TopLink,
};

/// Link counts by lifecycle status.
#[derive(Debug, Serialize)]
pub struct LinkStatsResponse {
    pub active: i64,
    pub expired: i64,
    pub revoked: i64,
    pub total: i64,
}

impl From<LinkStatusCounts> for LinkStatsResponse {
    fn from(counts: LinkStatusCounts) -> Self {
        Self {
            total: counts.active + counts.expired + counts.revoked,
            active: counts.active,
            expired: counts.expired,
            revoked: counts.revoked,
        }
    }
}

/// Aggregate access outcomes over the whole audit trail.
#[derive(Debug, Serialize)]
pub struct AccessSummaryResponse {
    pub total: i64,
    pub success: i64,
    pub failed: i64,
    pub expired: i64,
    pub unique_origins: i64,
    pub success_ratio: f64,
    /// Share of attempts denied because the link had expired.
    pub expiration_ratio: f64,
}

impl From<AccessSummary> for AccessSummaryResponse {
    fn from(summary: AccessSummary) -> Self {
        let ratio = |part: i64| {
            if summary.total > 0 {
                part as f64 / summary.total as f64
            } else {
                0.0
            }
        };
        Self {
            total: summary.total,
            success: summary.success,
            failed: summary.failed,
            expired: summary.expired,
            unique_origins: summary.unique_origins,
            success_ratio: ratio(summary.success),
            expiration_ratio: ratio(summary.expired),
        }
    }
}

/// Denied accesses grouped by denial reason.
#[derive(Debug, Serialize)]
pub struct FailureCountResponse {
    pub result: String,
    pub count: i64,
}

impl From<ResultCount> for FailureCountResponse {
    fn from(entry: ResultCount) -> Self {
        Self {
            result: entry.result.as_str().to_string(),
            count: entry.count,
        }
    }
}

/// Accesses per calendar day.
#[derive(Debug, Serialize)]
pub struct DailyCountResponse {
    pub day: NaiveDate,
    pub count: i64,
}

impl From<DailyCount> for DailyCountResponse {
    fn from(entry: DailyCount) -> Self {
        Self {
            day: entry.day,
            count: entry.count,
        }
    }
}

/// Accesses per hour of the day.
#[derive(Debug, Serialize)]
pub struct HourlyCountResponse {
    pub hour: i32,
    pub count: i64,
}

impl From<HourlyCount> for HourlyCountResponse {
    fn from(entry: HourlyCount) -> Self {
        Self {
            hour: entry.hour,
            count: entry.count,
        }
    }
}

/// Most-resolved links.
#[derive(Debug, Serialize)]
pub struct TopLinkResponse {
    pub short_code: String,
    pub access_count: i64,
}

impl From<TopLink> for TopLinkResponse {
    fn from(entry: TopLink) -> Self {
        Self {
            short_code: entry.short_code,
            access_count: entry.access_count,
        }
    }
}

/// Links accumulating the most password denials.
#[derive(Debug, Serialize)]
pub struct SecurityExceptionResponse {
    pub short_code: String,
    pub count: i64,
}

impl From<SecurityExceptionCount> for SecurityExceptionResponse {
    fn from(entry: SecurityExceptionCount) -> Self {
        Self {
            short_code: entry.short_code,
            count: entry.count,
        }
    }
}

/// One audit row in a per-code access history.
#[derive(Debug, Serialize)]
pub struct AuditRecordResponse {
    pub result: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

impl From<AccessAuditRecord> for AuditRecordResponse {
    fn from(record: AccessAuditRecord) -> Self {
        Self {
            result: record.result.as_str().to_string(),
            ip_address: record.ip_address,
            user_agent: record.user_agent,
            accessed_at: record.accessed_at,
        }
    }
}
