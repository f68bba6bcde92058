//! Application services implementing the business logic.

pub mod create_service;
pub mod expiration_service;
pub mod resolve_service;
pub mod revoke_service;
pub mod stats_service;

pub use create_service::{CreateLinkService, CreatedLink, LinkOptions};
pub use expiration_service::{run_expiration_sweeper, ExpirationService};
pub use resolve_service::{Resolution, ResolveService};
pub use revoke_service::RevokeLinkService;
pub use stats_service::StatsService;
