//! Application layer: services orchestrating domain and infrastructure.

pub mod services;
