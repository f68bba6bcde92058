//! Repository trait for secure link data access.

use crate::domain::entities::{NewSecureLink, SecureLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for secure link persistence.
///
/// Links are never physically deleted: terminal-state records stay queryable
/// for auditing and reporting.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists
    /// (backed by a unique constraint), [`AppError::Internal`] on database
    /// errors.
    async fn insert(&self, new_link: NewSecureLink) -> Result<SecureLink, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<SecureLink>, AppError>;

    /// Checks whether a short code is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError>;

    /// Version-checked write of the link's mutable state (`view_count`,
    /// `status`).
    ///
    /// Applies only when the stored `version` still matches the caller's
    /// copy, bumping it on success. Returns `Ok(false)` when a concurrent
    /// writer won the race; the caller must re-read and redo its checks
    /// rather than overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, link: &SecureLink) -> Result<bool, AppError>;

    /// Transitions every `ACTIVE` link whose TTL or view quota has fired to
    /// `EXPIRED`, as one atomic batch write. Returns the number of links
    /// transitioned.
    ///
    /// Already-expired links do not match the predicate, which makes the
    /// sweep idempotent by construction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn expire_due(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
