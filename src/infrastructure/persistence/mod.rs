//! PostgreSQL repository implementations.

pub mod pg_audit_repository;
pub mod pg_link_repository;
pub mod pg_stats_repository;

pub use pg_audit_repository::PgAuditRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;
