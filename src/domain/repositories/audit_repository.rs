//! Repository trait for the append-only access audit trail.

use crate::domain::entities::NewAuditRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store for access audit records.
///
/// Each append is an independent single-row insert: it is never guarded by
/// the link's version check and must commit even when the resolution that
/// produced it is denied or its link write is rejected.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAuditRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends one immutable audit row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn append(&self, record: NewAuditRecord) -> Result<(), AppError>;
}
