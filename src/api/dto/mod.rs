//! Request and response DTOs for the HTTP API.

pub mod create_link;
pub mod health;
pub mod resolve;
pub mod stats;
