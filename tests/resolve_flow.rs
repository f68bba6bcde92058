//! End-to-end resolution flows over in-memory storage.
//!
//! Exercises the real services against in-memory repositories: view quota
//! exhaustion, password gating, lazy TTL expiry, revocation, the sweep,
//! and the audit trail written along the way.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{InMemoryAuditRepository, InMemoryFileStore, InMemoryLinkRepository};
use secure_link::application::services::{
    CreateLinkService, ExpirationService, LinkOptions, Resolution, ResolveService,
    RevokeLinkService,
};
use secure_link::domain::entities::{
    AccessContext, AccessResult, LinkStatus, LinkTarget, SecureLink,
};
use secure_link::error::AppError;

struct Harness {
    links: Arc<InMemoryLinkRepository>,
    audits: Arc<InMemoryAuditRepository>,
    files: Arc<InMemoryFileStore>,
    resolve: ResolveService<InMemoryLinkRepository, InMemoryAuditRepository, InMemoryFileStore>,
    create: CreateLinkService<InMemoryLinkRepository, InMemoryFileStore>,
    revoke: RevokeLinkService<InMemoryLinkRepository>,
    sweep: ExpirationService<InMemoryLinkRepository>,
}

impl Harness {
    fn new() -> Self {
        let links = Arc::new(InMemoryLinkRepository::new());
        let audits = Arc::new(InMemoryAuditRepository::new());
        let files = Arc::new(InMemoryFileStore::new());

        Self {
            resolve: ResolveService::new(links.clone(), audits.clone(), files.clone()),
            create: CreateLinkService::new(
                links.clone(),
                files.clone(),
                "https://links.example.com".to_string(),
                Duration::hours(24),
            ),
            revoke: RevokeLinkService::new(links.clone()),
            sweep: ExpirationService::new(links.clone()),
            links,
            audits,
            files,
        }
    }

    fn seed_redirect(&self, short_code: &str) -> SecureLink {
        let link = SecureLink {
            id: Uuid::new_v4(),
            short_code: short_code.to_string(),
            target: LinkTarget::Redirect {
                url: "https://example.com/doc".to_string(),
            },
            expires_at: None,
            max_views: None,
            view_count: 0,
            status: LinkStatus::Active,
            password_hash: None,
            created_at: Utc::now(),
            version: 0,
        };
        self.links.seed(link.clone());
        link
    }

    fn results(&self) -> Vec<AccessResult> {
        self.audits.records().iter().map(|r| r.result).collect()
    }
}

fn context() -> AccessContext {
    AccessContext {
        ip_address: Some("198.51.100.4".to_string()),
        user_agent: Some("integration-test".to_string()),
    }
}

#[tokio::test]
async fn single_view_link_survives_first_resolve_then_locks_out() {
    let h = Harness::new();
    let created = h
        .create
        .create_redirect(
            "https://example.com/doc",
            LinkOptions {
                max_views: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let first = h
        .resolve
        .resolve(&created.short_code, None, &context())
        .await
        .unwrap();
    assert!(matches!(first, Resolution::Redirect { .. }));

    // The exhausted quota is only detected at the next read.
    let after_first = h.links.get(&created.short_code).unwrap();
    assert_eq!(after_first.status, LinkStatus::Active);
    assert_eq!(after_first.view_count, 1);

    let second = h
        .resolve
        .resolve(&created.short_code, None, &context())
        .await
        .unwrap_err();
    assert!(matches!(second, AppError::Gone { .. }));

    let after_second = h.links.get(&created.short_code).unwrap();
    assert_eq!(after_second.status, LinkStatus::Expired);
    assert_eq!(after_second.view_count, 1);

    assert_eq!(
        h.results(),
        vec![AccessResult::Success, AccessResult::ViewLimitReached]
    );
}

#[tokio::test]
async fn password_gate_denies_missing_and_wrong_then_admits() {
    let h = Harness::new();
    let created = h
        .create
        .create_redirect(
            "https://example.com/doc",
            LinkOptions {
                password: Some("open-sesame".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let missing = h
        .resolve
        .resolve(&created.short_code, None, &context())
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::Unauthorized { .. }));

    let wrong = h
        .resolve
        .resolve(&created.short_code, Some("guess"), &context())
        .await
        .unwrap_err();
    assert!(matches!(wrong, AppError::Unauthorized { .. }));

    // Failed password attempts consume no views.
    assert_eq!(h.links.get(&created.short_code).unwrap().view_count, 0);

    let correct = h
        .resolve
        .resolve(&created.short_code, Some("open-sesame"), &context())
        .await
        .unwrap();
    assert!(matches!(correct, Resolution::Redirect { .. }));

    assert_eq!(
        h.results(),
        vec![
            AccessResult::PasswordRequired,
            AccessResult::InvalidPassword,
            AccessResult::Success,
        ]
    );
}

#[tokio::test]
async fn stale_link_expires_lazily_on_read() {
    let h = Harness::new();
    let mut link = h.seed_redirect("stale001");
    link.expires_at = Some(Utc::now() - Duration::hours(1));
    h.links.seed(link);

    let err = h
        .resolve
        .resolve("stale001", None, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Gone { .. }));

    // The read persisted the transition.
    assert_eq!(
        h.links.get("stale001").unwrap().status,
        LinkStatus::Expired
    );
    assert_eq!(h.results(), vec![AccessResult::Expired]);
}

#[tokio::test]
async fn unknown_code_is_denied_and_audited() {
    let h = Harness::new();

    let err = h
        .resolve
        .resolve("nope0000", None, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let records = h.audits.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].result, AccessResult::NotFound);
    assert_eq!(records[0].short_code, "nope0000");
    assert_eq!(records[0].ip_address.as_deref(), Some("198.51.100.4"));
}

#[tokio::test]
async fn revoked_link_stays_locked_and_revoke_is_idempotent() {
    let h = Harness::new();
    h.seed_redirect("gone0001");

    h.revoke.revoke("gone0001").await.unwrap();
    assert_eq!(
        h.links.get("gone0001").unwrap().status,
        LinkStatus::Revoked
    );

    // Repeat revocation succeeds without another write.
    let version_after_first = h.links.get("gone0001").unwrap().version;
    h.revoke.revoke("gone0001").await.unwrap();
    assert_eq!(h.links.get("gone0001").unwrap().version, version_after_first);

    let err = h
        .resolve
        .resolve("gone0001", None, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Gone { .. }));
    assert_eq!(h.results(), vec![AccessResult::Revoked]);

    let unknown = h.revoke.revoke("missing1").await.unwrap_err();
    assert!(matches!(unknown, AppError::NotFound { .. }));
}

#[tokio::test]
async fn sweep_expires_overdue_links_once() {
    let h = Harness::new();

    let mut overdue_time = h.seed_redirect("overdue1");
    overdue_time.expires_at = Some(Utc::now() - Duration::minutes(10));
    h.links.seed(overdue_time);

    let mut overdue_quota = h.seed_redirect("overdue2");
    overdue_quota.max_views = Some(2);
    overdue_quota.view_count = 2;
    h.links.seed(overdue_quota);

    let mut fresh = h.seed_redirect("fresh001");
    fresh.expires_at = Some(Utc::now() + Duration::hours(1));
    h.links.seed(fresh);

    assert_eq!(h.sweep.sweep().await.unwrap(), 2);
    assert_eq!(h.links.get("overdue1").unwrap().status, LinkStatus::Expired);
    assert_eq!(h.links.get("overdue2").unwrap().status, LinkStatus::Expired);
    assert_eq!(h.links.get("fresh001").unwrap().status, LinkStatus::Active);

    // Idempotent: a second pass finds nothing.
    assert_eq!(h.sweep.sweep().await.unwrap(), 0);

    // The sweep itself writes no audit rows.
    assert!(h.audits.records().is_empty());
}

#[tokio::test]
async fn expired_then_revoked_stays_revoked() {
    let h = Harness::new();
    let mut link = h.seed_redirect("term0001");
    link.expire();
    h.links.seed(link);

    h.revoke.revoke("term0001").await.unwrap();
    assert_eq!(
        h.links.get("term0001").unwrap().status,
        LinkStatus::Revoked
    );

    // A later sweep does not resurrect or re-expire it.
    h.sweep.sweep().await.unwrap();
    assert_eq!(
        h.links.get("term0001").unwrap().status,
        LinkStatus::Revoked
    );
}

#[tokio::test]
async fn uploaded_file_resolves_to_download() {
    let h = Harness::new();
    let created = h
        .create
        .create_upload("report.pdf", b"payload".to_vec(), LinkOptions::default())
        .await
        .unwrap();

    let resolution = h
        .resolve
        .resolve(&created.short_code, None, &context())
        .await
        .unwrap();

    match resolution {
        Resolution::Download { content, filename } => {
            assert_eq!(content, b"payload");
            assert_eq!(filename, "report.pdf");
        }
        other => panic!("expected download, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_backing_file_is_not_found_but_view_stands() {
    let h = Harness::new();
    let created = h
        .create
        .create_upload("report.pdf", b"payload".to_vec(), LinkOptions::default())
        .await
        .unwrap();

    let stored = h.links.get(&created.short_code).unwrap();
    let LinkTarget::File { path, .. } = &stored.target else {
        panic!("expected file target");
    };
    h.files.remove(path);

    let err = h
        .resolve
        .resolve(&created.short_code, None, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    // The view was consumed and the attempt audited as a success before
    // delivery failed.
    assert_eq!(h.links.get(&created.short_code).unwrap().view_count, 1);
    assert_eq!(h.results(), vec![AccessResult::Success]);
}

#[tokio::test]
async fn created_link_gets_default_ttl_and_access_url() {
    let h = Harness::new();
    let created = h
        .create
        .create_redirect("https://example.com/doc", LinkOptions::default())
        .await
        .unwrap();

    let expires_at = created.expires_at.expect("default TTL applied");
    let expected = Utc::now() + Duration::hours(24);
    assert!((expires_at - expected).num_seconds().abs() < 5);

    assert_eq!(
        created.access_url,
        format!("https://links.example.com/l/{}", created.short_code)
    );
    assert_eq!(created.short_code.len(), 8);
}
