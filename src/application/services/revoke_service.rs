//! Explicit link revocation.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tracing::info;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const MAX_CONFLICT_RETRIES: usize = 3;

/// Revokes links on demand.
///
/// Revocation is terminal and idempotent: revoking an already-revoked link
/// succeeds without touching storage, and any prior state, including
/// `Expired`, transitions to `Revoked`.
pub struct RevokeLinkService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> RevokeLinkService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Revokes the link behind `short_code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code.
    pub async fn revoke(&self, short_code: &str) -> Result<(), AppError> {
        for _ in 0..MAX_CONFLICT_RETRIES {
            let Some(mut link) = self.link_repository.find_by_code(short_code).await? else {
                return Err(AppError::not_found(
                    "Link not found",
                    json!({ "short_code": short_code }),
                ));
            };

            if link.is_revoked() {
                info!(short_code, "link already revoked");
                return Ok(());
            }

            link.revoke();
            if self.link_repository.update(&link).await? {
                info!(short_code, "link revoked");
                counter!("secure_link_revoked_total").increment(1);
                return Ok(());
            }
        }

        Err(AppError::internal(
            "Too many concurrent updates for link",
            json!({ "short_code": short_code }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LinkStatus, LinkTarget, SecureLink};
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use uuid::Uuid;

    fn link_with_status(status: LinkStatus) -> SecureLink {
        SecureLink {
            id: Uuid::new_v4(),
            short_code: "abc12345".to_string(),
            target: LinkTarget::Redirect {
                url: "https://example.com".to_string(),
            },
            expires_at: None,
            max_views: None,
            view_count: 0,
            status,
            password_hash: None,
            created_at: Utc::now(),
            version: 0,
        }
    }

    #[tokio::test]
    async fn test_revoke_active_link() {
        let mut links = MockLinkRepository::new();
        let link = link_with_status(LinkStatus::Active);
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        links
            .expect_update()
            .withf(|l| l.status == LinkStatus::Revoked)
            .times(1)
            .returning(|_| Ok(true));

        let result = RevokeLinkService::new(Arc::new(links))
            .revoke("abc12345")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_expired_link_still_transitions() {
        let mut links = MockLinkRepository::new();
        let link = link_with_status(LinkStatus::Expired);
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        links
            .expect_update()
            .withf(|l| l.status == LinkStatus::Revoked)
            .times(1)
            .returning(|_| Ok(true));

        let result = RevokeLinkService::new(Arc::new(links))
            .revoke("abc12345")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let mut links = MockLinkRepository::new();
        let link = link_with_status(LinkStatus::Revoked);
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));
        links.expect_update().times(0);

        let result = RevokeLinkService::new(Arc::new(links))
            .revoke("abc12345")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_unknown_code() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().times(1).returning(|_| Ok(None));

        let err = RevokeLinkService::new(Arc::new(links))
            .revoke("missing1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_revoke_retries_after_losing_version_race() {
        let mut links = MockLinkRepository::new();
        let link = link_with_status(LinkStatus::Active);
        links
            .expect_find_by_code()
            .times(2)
            .returning(move |_| Ok(Some(link.clone())));
        links.expect_update().times(1).returning(|_| Ok(false));
        links.expect_update().times(1).returning(|_| Ok(true));

        let result = RevokeLinkService::new(Arc::new(links))
            .revoke("abc12345")
            .await;

        assert!(result.is_ok());
    }
}
