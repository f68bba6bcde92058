//! Data access trait definitions implemented by the infrastructure layer.

pub mod audit_repository;
pub mod link_repository;
pub mod stats_repository;

pub use audit_repository::AuditRepository;
pub use link_repository::LinkRepository;
pub use stats_repository::{
    AccessSummary, DailyCount, HourlyCount, LinkStatusCounts, ResultCount,
    SecurityExceptionCount, StatsRepository, TopLink,
};

#[cfg(test)]
pub use audit_repository::MockAuditRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
