use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// Backing store for product photo binaries.
///
/// The database keeps only the generated filename and public URL; the bytes
/// live behind this trait so the backend can be swapped (local disk in this
/// deployment, object storage elsewhere) without touching the photo service.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persists `bytes` under `filename`, overwriting any previous content.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ServiceError>;

    /// Reads the stored bytes back, `NotFound` if the file is missing.
    async fn read(&self, filename: &str) -> Result<Vec<u8>, ServiceError>;

    /// Removes the stored file. Missing files are not an error: the row may
    /// outlive the blob after a partial failure and removal must stay
    /// idempotent for the compensating-cleanup paths.
    async fn remove(&self, filename: &str) -> Result<(), ServiceError>;
}

/// Filesystem-backed photo store rooted at a single upload directory.
pub struct FsPhotoStore {
    root: PathBuf,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the upload directory if needed and returns the store.
    pub async fn create(root: impl Into<PathBuf>) -> Result<Self, ServiceError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            ServiceError::StorageError(format!(
                "failed to create upload directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, ServiceError> {
        // Filenames are generated server-side, but refuse separators anyway
        // so a corrupt row can never reach outside the upload directory.
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.contains("..") {
            return Err(ServiceError::StorageError(format!(
                "invalid photo filename '{filename}'"
            )));
        }
        Ok(self.root.join(filename))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ServiceError> {
        let path = self.path_for(filename)?;
        fs::write(&path, bytes).await.map_err(|e| {
            ServiceError::StorageError(format!("failed to write {}: {e}", path.display()))
        })?;
        debug!(filename, size = bytes.len(), "photo file written");
        Ok(())
    }

    async fn read(&self, filename: &str) -> Result<Vec<u8>, ServiceError> {
        let path = self.path_for(filename)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ServiceError::NotFound(
                format!("photo file '{filename}' not found"),
            )),
            Err(e) => Err(ServiceError::StorageError(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn remove(&self, filename: &str) -> Result<(), ServiceError> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(filename, "photo file already gone");
                Ok(())
            }
            Err(e) => Err(ServiceError::StorageError(format!(
                "failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn save_read_remove_round_trip() {
        let dir = tempdir().unwrap();
        let store = FsPhotoStore::create(dir.path()).await.unwrap();

        store.save("a.png", b"bytes").await.unwrap();
        assert_eq!(store.read("a.png").await.unwrap(), b"bytes");

        store.remove("a.png").await.unwrap();
        assert!(matches!(
            store.read("a.png").await,
            Err(ServiceError::NotFound(_))
        ));
        // Idempotent removal
        store.remove("a.png").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_traversal_filenames() {
        let dir = tempdir().unwrap();
        let store = FsPhotoStore::new(dir.path());
        assert!(store.read("../etc/passwd").await.is_err());
        assert!(store.save("a/b.png", b"x").await.is_err());
    }
}
