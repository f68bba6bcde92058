//! Utility functions used across the application.
//!
//! - [`code_generator`] - Short code generation and access URL formatting
//! - [`password`] - Argon2id hashing for link passwords

pub mod code_generator;
pub mod password;
