//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, storage setup, sweeper spawning, and Axum
//! server lifecycle.

use crate::application::services::{
    run_expiration_sweeper, CreateLinkService, ExpirationService, ResolveService,
    RevokeLinkService, StatsService,
};
use crate::config::Config;
use crate::domain::sweeper::SweeperStatus;
use crate::infrastructure::persistence::{
    PgAuditRepository, PgLinkRepository, PgStatsRepository,
};
use crate::infrastructure::storage::FsFileStore;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::ServiceExt;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - File storage directory
/// - Background expiration sweeper
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Storage directory cannot be created
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let file_store = Arc::new(
        FsFileStore::new(PathBuf::from(&config.storage_path))
            .context("Failed to initialize file storage")?,
    );

    let pool_arc = Arc::new(pool.clone());
    let link_repository = Arc::new(PgLinkRepository::new(pool_arc.clone()));
    let audit_repository = Arc::new(PgAuditRepository::new(pool_arc.clone()));
    let stats_repository = Arc::new(PgStatsRepository::new(pool_arc.clone()));

    let sweeper_status = Arc::new(SweeperStatus::new());
    tokio::spawn(run_expiration_sweeper(
        ExpirationService::new(link_repository.clone()),
        sweeper_status.clone(),
        Duration::from_secs(config.sweep_interval_seconds),
    ));
    tracing::info!("Expiration sweeper started");

    let state = AppState {
        db: pool,
        resolve_service: Arc::new(ResolveService::new(
            link_repository.clone(),
            audit_repository,
            file_store.clone(),
        )),
        create_service: Arc::new(CreateLinkService::new(
            link_repository.clone(),
            file_store.clone(),
            config.base_url.clone(),
            chrono::Duration::seconds(config.default_ttl_seconds as i64),
        )),
        revoke_service: Arc::new(RevokeLinkService::new(link_repository)),
        stats_service: Arc::new(StatsService::new(stats_repository)),
        file_store,
        sweeper_status,
        sweep_interval_seconds: config.sweep_interval_seconds,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
