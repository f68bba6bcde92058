//! Background expiration sweep.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::repositories::LinkRepository;
use crate::domain::sweeper::SweeperStatus;
use crate::error::AppError;

/// Marks overdue links `Expired` in bulk.
///
/// The whole sweep is one batch update whose predicate selects exactly the
/// active links with a fired TTL or view-quota trigger, so concurrent or
/// repeated sweeps converge on the same result.
pub struct ExpirationService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> ExpirationService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Runs one sweep and returns how many links were expired.
    pub async fn sweep(&self) -> Result<u64, AppError> {
        let expired = self.link_repository.expire_due(Utc::now()).await?;

        if expired > 0 {
            info!(expired, "expiration sweep marked links expired");
        } else {
            debug!("expiration sweep found nothing to expire");
        }

        Ok(expired)
    }
}

/// Periodic sweep loop, spawned once at startup.
///
/// A failed sweep is logged and the loop keeps going; `status` records the
/// last completed run for health reporting.
pub async fn run_expiration_sweeper<L: LinkRepository>(
    service: ExpirationService<L>,
    status: Arc<SweeperStatus>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_secs = interval.as_secs(), "expiration sweeper started");

    loop {
        ticker.tick().await;

        match service.sweep().await {
            Ok(_) => status.mark_run(),
            Err(error) => warn!(%error, "expiration sweep failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;

    #[tokio::test]
    async fn test_sweep_reports_expired_count() {
        let mut links = MockLinkRepository::new();
        links.expect_expire_due().times(1).returning(|_| Ok(2));

        let expired = ExpirationService::new(Arc::new(links)).sweep().await.unwrap();

        assert_eq!(expired, 2);
    }

    #[tokio::test]
    async fn test_sweep_with_nothing_due() {
        let mut links = MockLinkRepository::new();
        links.expect_expire_due().times(1).returning(|_| Ok(0));

        let expired = ExpirationService::new(Arc::new(links)).sweep().await.unwrap();

        assert_eq!(expired, 0);
    }
}
