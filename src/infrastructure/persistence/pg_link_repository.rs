//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{LinkStatus, LinkTarget, NewSecureLink, SecureLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, short_code, target_url, file_path, original_filename, \
     expires_at, max_views, view_count, status, password_hash, created_at, version";

/// PostgreSQL repository for secure links.
///
/// Queries are runtime-checked (`query_as` + `FromRow`); the tagged target
/// union is flattened into nullable columns guarded by a CHECK constraint
/// and reassembled on read.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    short_code: String,
    target_url: Option<String>,
    file_path: Option<String>,
    original_filename: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    max_views: Option<i32>,
    view_count: i32,
    status: String,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<LinkRow> for SecureLink {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, AppError> {
        let target = match (row.target_url, row.file_path, row.original_filename) {
            (Some(url), None, None) => LinkTarget::Redirect { url },
            (None, Some(path), Some(original_filename)) => LinkTarget::File {
                path,
                original_filename,
            },
            _ => {
                return Err(AppError::internal(
                    "Corrupt link row: target columns violate the single-target invariant",
                    json!({ "short_code": row.short_code }),
                ));
            }
        };

        let status = LinkStatus::parse(&row.status).ok_or_else(|| {
            AppError::internal(
                "Corrupt link row: unknown status",
                json!({ "short_code": row.short_code, "status": row.status }),
            )
        })?;

        Ok(SecureLink {
            id: row.id,
            short_code: row.short_code,
            target,
            expires_at: row.expires_at,
            max_views: row.max_views,
            view_count: row.view_count,
            status,
            password_hash: row.password_hash,
            created_at: row.created_at,
            version: row.version,
        })
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewSecureLink) -> Result<SecureLink, AppError> {
        let (target_url, file_path, original_filename) = match new_link.target {
            LinkTarget::Redirect { url } => (Some(url), None, None),
            LinkTarget::File {
                path,
                original_filename,
            } => (None, Some(path), Some(original_filename)),
        };

        let sql = format!(
            "INSERT INTO secure_links \
                 (short_code, target_url, file_path, original_filename, \
                  expires_at, max_views, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {LINK_COLUMNS}"
        );

        let row: LinkRow = sqlx::query_as(&sql)
            .bind(&new_link.short_code)
            .bind(target_url)
            .bind(file_path)
            .bind(original_filename)
            .bind(new_link.expires_at)
            .bind(new_link.max_views)
            .bind(new_link.password_hash)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<SecureLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM secure_links WHERE short_code = $1");

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(SecureLink::try_from).transpose()
    }

    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM secure_links WHERE short_code = $1)")
                .bind(short_code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn update(&self, link: &SecureLink) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE secure_links \
             SET view_count = $2, status = $3, version = version + 1 \
             WHERE id = $1 AND version = $4",
        )
        .bind(link.id)
        .bind(link.view_count)
        .bind(link.status.as_str())
        .bind(link.version)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn expire_due(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE secure_links \
             SET status = 'EXPIRED', version = version + 1 \
             WHERE status = 'ACTIVE' \
               AND ((expires_at IS NOT NULL AND expires_at <= $1) \
                 OR (max_views IS NOT NULL AND view_count >= max_views))",
        )
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}
