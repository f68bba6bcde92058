//! HTTP request handlers.

pub mod create;
pub mod health;
pub mod resolve;
pub mod revoke;
pub mod stats;
pub mod upload;

pub use create::create_link_handler;
pub use health::health_handler;
pub use resolve::resolve_handler;
pub use revoke::revoke_link_handler;
pub use upload::upload_link_handler;
