//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`sweeper`] - Status registry for the background expiration sweeper
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is orchestrated by services (see [`crate::application::services`])

pub mod entities;
pub mod repositories;
pub mod sweeper;
