//! Link resolution service: the ordered access-control pipeline.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use metrics::{counter, histogram};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{AccessContext, AccessResult, LinkTarget, NewAuditRecord};
use crate::domain::repositories::{AuditRepository, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::storage::FileStore;
use crate::utils::password::verify_password;

/// Successful resolution outcome.
#[derive(Debug)]
pub enum Resolution {
    Redirect {
        url: String,
    },
    Download {
        content: Vec<u8>,
        filename: String,
    },
}

/// How many times a losing concurrent writer re-reads and redoes its checks
/// before giving up.
const MAX_CONFLICT_RETRIES: usize = 3;

/// Resolves short codes into redirect or download outcomes.
///
/// Runs the ordered, short-circuiting check sequence: lookup, revocation,
/// TTL expiry, view quota, password gate, view increment. Exactly one audit
/// record is written per invocation, on the branch that terminates the
/// call.
///
/// Writes to the link go through the repository's version check; a lost
/// race restarts the read-check sequence so two resolutions near the view
/// quota can never both pass it.
pub struct ResolveService<L: LinkRepository, A: AuditRepository, F: FileStore> {
    link_repository: Arc<L>,
    audit_repository: Arc<A>,
    file_store: Arc<F>,
}

impl<L: LinkRepository, A: AuditRepository, F: FileStore> ResolveService<L, A, F> {
    /// Creates a new resolve service.
    pub fn new(link_repository: Arc<L>, audit_repository: Arc<A>, file_store: Arc<F>) -> Self {
        Self {
            link_repository,
            audit_repository,
            file_store,
        }
    }

    /// Resolves a short code, enforcing every access-control check in order.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown code, or the backing file is gone
    /// - [`AppError::Gone`] - revoked, expired, quota-exhausted, or any
    ///   other non-active state
    /// - [`AppError::Unauthorized`] - password missing or wrong
    /// - [`AppError::Internal`] - storage failure or exhausted write retries
    pub async fn resolve(
        &self,
        short_code: &str,
        password: Option<&str>,
        context: &AccessContext,
    ) -> Result<Resolution, AppError> {
        info!(short_code, "resolve attempt");
        counter!("secure_link_resolve_attempts_total").increment(1);

        let started = Instant::now();
        let outcome = self.resolve_inner(short_code, password, context).await;
        histogram!("secure_link_resolve_duration_seconds").record(started.elapsed().as_secs_f64());

        outcome
    }

    async fn resolve_inner(
        &self,
        short_code: &str,
        password: Option<&str>,
        context: &AccessContext,
    ) -> Result<Resolution, AppError> {
        for _ in 0..MAX_CONFLICT_RETRIES {
            let Some(mut link) = self.link_repository.find_by_code(short_code).await? else {
                return self
                    .deny(
                        short_code,
                        AccessResult::NotFound,
                        "not_found",
                        context,
                        AppError::not_found("Link not found", json!({ "short_code": short_code })),
                    )
                    .await;
            };

            if link.is_revoked() {
                return self
                    .deny(
                        short_code,
                        AccessResult::Revoked,
                        "revoked",
                        context,
                        gone(short_code),
                    )
                    .await;
            }

            // Lazy expiration: a stale link read persists its own expiry
            // before the denial is reported.
            if link.expire_if_due(Utc::now()) {
                if !self.link_repository.update(&link).await? {
                    continue;
                }
                return self
                    .deny(
                        short_code,
                        AccessResult::Expired,
                        "expired",
                        context,
                        gone(short_code),
                    )
                    .await;
            }

            if link.has_reached_view_limit() {
                link.expire();
                if !self.link_repository.update(&link).await? {
                    continue;
                }
                return self
                    .deny(
                        short_code,
                        AccessResult::ViewLimitReached,
                        "view_limit_reached",
                        context,
                        gone(short_code),
                    )
                    .await;
            }

            // Catch-all for any non-active state the checks above missed.
            if !link.is_active() {
                return self
                    .deny(
                        short_code,
                        AccessResult::UnexpectedState,
                        "inactive",
                        context,
                        gone(short_code),
                    )
                    .await;
            }

            if let Some(hash) = link.password_hash.as_deref() {
                match password.map(str::trim).filter(|p| !p.is_empty()) {
                    None => {
                        return self
                            .deny(
                                short_code,
                                AccessResult::PasswordRequired,
                                "password_required",
                                context,
                                AppError::unauthorized(
                                    "Password required",
                                    json!({ "short_code": short_code }),
                                ),
                            )
                            .await;
                    }
                    Some(supplied) if !verify_password(supplied, hash) => {
                        return self
                            .deny(
                                short_code,
                                AccessResult::InvalidPassword,
                                "invalid_password",
                                context,
                                AppError::unauthorized(
                                    "Invalid password",
                                    json!({ "short_code": short_code }),
                                ),
                            )
                            .await;
                    }
                    Some(_) => {}
                }
            }

            link.record_view();
            if !self.link_repository.update(&link).await? {
                continue;
            }

            info!(short_code, view_count = link.view_count, "resolve success");
            counter!("secure_link_resolve_success_total").increment(1);
            self.audit_repository
                .append(NewAuditRecord::new(
                    short_code,
                    AccessResult::Success,
                    context,
                ))
                .await?;

            return match link.target {
                LinkTarget::Redirect { url } => Ok(Resolution::Redirect { url }),
                LinkTarget::File {
                    path,
                    original_filename,
                } => match self.file_store.load(&path).await? {
                    Some(content) => Ok(Resolution::Download {
                        content,
                        filename: original_filename,
                    }),
                    // The view increment above stands even though delivery
                    // fails here.
                    None => Err(AppError::not_found(
                        "File not found",
                        json!({ "short_code": short_code }),
                    )),
                },
            };
        }

        warn!(short_code, "resolve aborted: conflict retries exhausted");
        Err(AppError::internal(
            "Too many concurrent updates for link",
            json!({ "short_code": short_code }),
        ))
    }

    /// Terminates a denied resolution: logs, counts, audits, then fails.
    ///
    /// The audit row is written before the error is returned so the trail
    /// is complete even under denial.
    async fn deny(
        &self,
        short_code: &str,
        result: AccessResult,
        reason: &'static str,
        context: &AccessContext,
        error: AppError,
    ) -> Result<Resolution, AppError> {
        warn!(short_code, reason, "resolve denied");
        counter!("secure_link_resolve_denied_total", "reason" => reason).increment(1);

        self.audit_repository
            .append(NewAuditRecord::new(short_code, result, context))
            .await?;

        Err(error)
    }
}

fn gone(short_code: &str) -> AppError {
    AppError::gone("Link access denied", json!({ "short_code": short_code }))
}
