//! Infrastructure layer: database and file storage integrations.

pub mod persistence;
pub mod storage;
