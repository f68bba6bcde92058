//! File storage for uploaded link payloads.

pub mod fs_store;

pub use fs_store::FsFileStore;

use crate::error::AppError;
use async_trait::async_trait;

/// Storage interface for file-backed link payloads.
///
/// The resolve path only needs two things from storage: persist an uploaded
/// payload under an opaque name, and load it back by the stored path. A
/// missing payload at delivery time is `Ok(None)`, not an error: the caller
/// decides how to report it.
///
/// # Implementations
///
/// - [`FsFileStore`] - local filesystem implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores a payload and returns the path to load it back later.
    ///
    /// The stored name is random; only the extension of `original_filename`
    /// is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on I/O failure.
    async fn store(&self, original_filename: &str, content: &[u8]) -> Result<String, AppError>;

    /// Loads a stored payload. `Ok(None)` when the backing file is missing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on I/O failure other than absence.
    async fn load(&self, path: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Whether the storage location currently accepts writes. Used by the
    /// health endpoint.
    fn is_writable(&self) -> bool;
}
