//! Core business data structures.

pub mod audit;
pub mod link;

pub use audit::{AccessAuditRecord, AccessContext, AccessResult, NewAuditRecord};
pub use link::{LinkStatus, LinkTarget, NewSecureLink, SecureLink};
