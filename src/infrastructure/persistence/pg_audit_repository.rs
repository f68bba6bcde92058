//! PostgreSQL implementation of the audit repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::NewAuditRecord;
use crate::domain::repositories::AuditRepository;
use crate::error::AppError;

/// PostgreSQL append-only store for access audit rows.
///
/// Each append is its own statement on its own pooled connection, so an
/// audit row commits regardless of what happens to the link write that
/// triggered it.
pub struct PgAuditRepository {
    pool: Arc<PgPool>,
}

impl PgAuditRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PgAuditRepository {
    async fn append(&self, record: NewAuditRecord) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO link_access_audit \
                 (short_code, result, ip_address, user_agent, accessed_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&record.short_code)
        .bind(record.result.as_str())
        .bind(&record.ip_address)
        .bind(&record.user_agent)
        .bind(record.accessed_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
