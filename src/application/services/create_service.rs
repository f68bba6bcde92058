//! Link creation service: redirect links and file uploads.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use serde_json::json;
use tracing::info;

use crate::domain::entities::{LinkTarget, NewSecureLink, SecureLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::storage::FileStore;
use crate::utils::code_generator::{access_url, generate_code};
use crate::utils::password::hash_password;

/// How many fresh codes are tried before giving up on allocation.
const MAX_CODE_ATTEMPTS: usize = 10;

/// A freshly issued link, as returned to the caller.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub short_code: String,
    pub access_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<i32>,
}

/// Common creation options shared by redirect links and uploads.
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<i32>,
    pub password: Option<String>,
}

/// Issues new secure links.
///
/// Allocates a unique short code, hashes the optional password, applies
/// the default TTL when the caller gives none, and persists the link.
pub struct CreateLinkService<L: LinkRepository, F: FileStore> {
    link_repository: Arc<L>,
    file_store: Arc<F>,
    base_url: String,
    default_ttl: Duration,
}

impl<L: LinkRepository, F: FileStore> CreateLinkService<L, F> {
    /// Creates a new service.
    pub fn new(
        link_repository: Arc<L>,
        file_store: Arc<F>,
        base_url: String,
        default_ttl: Duration,
    ) -> Self {
        Self {
            link_repository,
            file_store,
            base_url,
            default_ttl,
        }
    }

    /// Issues a link that redirects to `target_url`.
    pub async fn create_redirect(
        &self,
        target_url: &str,
        options: LinkOptions,
    ) -> Result<CreatedLink, AppError> {
        let target = LinkTarget::Redirect {
            url: target_url.to_string(),
        };
        let link = self.create(target, options).await?;

        counter!("secure_link_created_total", "type" => "redirect").increment(1);
        Ok(self.created(link))
    }

    /// Stores `content` and issues a link that serves it as a download.
    pub async fn create_upload(
        &self,
        original_filename: &str,
        content: Vec<u8>,
        options: LinkOptions,
    ) -> Result<CreatedLink, AppError> {
        if content.is_empty() {
            return Err(AppError::bad_request(
                "Uploaded file is empty",
                json!({ "filename": original_filename }),
            ));
        }

        let path = self.file_store.store(original_filename, &content).await?;
        let target = LinkTarget::File {
            path,
            original_filename: original_filename.to_string(),
        };
        let link = self.create(target, options).await?;

        counter!("secure_link_created_total", "type" => "file").increment(1);
        Ok(self.created(link))
    }

    async fn create(
        &self,
        target: LinkTarget,
        options: LinkOptions,
    ) -> Result<SecureLink, AppError> {
        let expires_at = self.resolve_expires_at(options.expires_at)?;
        let password_hash = options
            .password
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(hash_password)
            .transpose()?;

        if let Some(max) = options.max_views {
            if max <= 0 {
                return Err(AppError::bad_request(
                    "max_views must be positive",
                    json!({ "max_views": max }),
                ));
            }
        }

        let short_code = self.allocate_code().await?;
        let link = self
            .link_repository
            .insert(NewSecureLink {
                short_code,
                target,
                expires_at,
                max_views: options.max_views,
                password_hash,
            })
            .await?;

        info!(
            short_code = %link.short_code,
            expires_at = ?link.expires_at,
            max_views = ?link.max_views,
            protected = link.is_password_protected(),
            "link created"
        );
        Ok(link)
    }

    /// Applies the configured default TTL when no expiry is supplied, and
    /// rejects expiry timestamps that are already in the past.
    fn resolve_expires_at(
        &self,
        requested: Option<DateTime<Utc>>,
    ) -> Result<Option<DateTime<Utc>>, AppError> {
        match requested {
            Some(at) if at <= Utc::now() => Err(AppError::bad_request(
                "expires_at must be in the future",
                json!({ "expires_at": at.to_rfc3339() }),
            )),
            Some(at) => Ok(Some(at)),
            None => Ok(Some(Utc::now() + self.default_ttl)),
        }
    }

    /// Draws random codes until one is free.
    ///
    /// A duplicate here only narrows the race window; the unique constraint
    /// on the column is the actual guarantee.
    async fn allocate_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code();
            if !self.link_repository.exists_by_code(&code).await? {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Unable to allocate a unique short code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    fn created(&self, link: SecureLink) -> CreatedLink {
        CreatedLink {
            access_url: access_url(&self.base_url, &link.short_code),
            short_code: link.short_code,
            expires_at: link.expires_at,
            max_views: link.max_views,
        }
    }
}
