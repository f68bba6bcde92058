//! Local filesystem implementation of [`FileStore`].

use async_trait::async_trait;
use serde_json::json;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::AppError;
use crate::infrastructure::storage::FileStore;

/// Stores payloads as flat files under a configured root directory.
///
/// Stored names are random UUIDs with the upload's extension appended, so
/// user-supplied filenames never reach the filesystem.
pub struct FsFileStore {
    root: PathBuf,
}

impl FsFileStore {
    /// Creates the store, ensuring the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the directory cannot be created.
    pub fn new(root: PathBuf) -> Result<Self, AppError> {
        std::fs::create_dir_all(&root).map_err(|e| {
            AppError::internal(
                "Failed to create storage directory",
                json!({ "path": root.display().to_string(), "reason": e.to_string() }),
            )
        })?;

        Ok(Self { root })
    }

    fn extension_of(filename: &str) -> &str {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }
}

#[async_trait]
impl FileStore for FsFileStore {
    async fn store(&self, original_filename: &str, content: &[u8]) -> Result<String, AppError> {
        let extension = Self::extension_of(original_filename);
        let stored_name = if extension.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            format!("{}.{}", Uuid::new_v4(), extension)
        };

        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, content).await.map_err(|e| {
            AppError::internal(
                "Failed to store file",
                json!({ "path": path.display().to_string(), "reason": e.to_string() }),
            )
        })?;

        Ok(path.display().to_string())
    }

    async fn load(&self, path: &str) -> Result<Option<Vec<u8>>, AppError> {
        match tokio::fs::read(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::internal(
                "Failed to read stored file",
                json!({ "path": path, "reason": e.to_string() }),
            )),
        }
    }

    fn is_writable(&self) -> bool {
        self.root
            .metadata()
            .map(|m| m.is_dir() && !m.permissions().readonly())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsFileStore::new(dir.path().to_path_buf()).unwrap();

        let path = store.store("report.pdf", b"payload").await.unwrap();
        assert!(path.ends_with(".pdf"));

        let content = store.load(&path).await.unwrap();
        assert_eq!(content.as_deref(), Some(b"payload".as_slice()));
    }

    #[tokio::test]
    async fn test_stored_name_is_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsFileStore::new(dir.path().to_path_buf()).unwrap();

        let path = store.store("../../etc/passwd", b"x").await.unwrap();
        assert!(!path.contains(".."));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsFileStore::new(dir.path().to_path_buf()).unwrap();

        let missing = dir.path().join("nope.bin").display().to_string();
        assert!(store.load(&missing).await.unwrap().is_none());
    }

    #[test]
    fn test_is_writable_on_fresh_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsFileStore::new(dir.path().to_path_buf()).unwrap();
        assert!(store.is_writable());
    }
}
