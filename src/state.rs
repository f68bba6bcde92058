use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    CreateLinkService, ResolveService, RevokeLinkService, StatsService,
};
use crate::domain::sweeper::SweeperStatus;
use crate::infrastructure::persistence::{
    PgAuditRepository, PgLinkRepository, PgStatsRepository,
};
use crate::infrastructure::storage::FsFileStore;

pub type AppResolveService = ResolveService<PgLinkRepository, PgAuditRepository, FsFileStore>;
pub type AppCreateService = CreateLinkService<PgLinkRepository, FsFileStore>;
pub type AppRevokeService = RevokeLinkService<PgLinkRepository>;
pub type AppStatsService = StatsService<PgStatsRepository>;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub resolve_service: Arc<AppResolveService>,
    pub create_service: Arc<AppCreateService>,
    pub revoke_service: Arc<AppRevokeService>,
    pub stats_service: Arc<AppStatsService>,
    pub file_store: Arc<FsFileStore>,
    pub sweeper_status: Arc<SweeperStatus>,
    /// Sweeper period in seconds, used to judge sweeper freshness.
    pub sweep_interval_seconds: u64,
    pub behind_proxy: bool,
}
