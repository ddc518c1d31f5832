//! Filesystem-backed asset store.

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::security::{PathTraversalError, sanitize_asset_path, validate_path_within_base};

/// A freshly written asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Random id, also the file stem.
    pub id: String,
    /// Path relative to the asset root, always with `/` separators.
    pub storage_path: String,
    pub size: u64,
}

/// Binary image store rooted at one directory.
///
/// `AssetStore` is cheap to clone; all filesystem work runs on the blocking
/// thread pool.
#[derive(Clone, Debug)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Opens the store, creating the root directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn open<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create asset directory: {}", root.display()))?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a client- or catalog-supplied relative path to a file under
    /// the root. The file does not have to exist.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for an empty path
    /// - [`Error::PathTraversal`] if the path is absolute, contains `..` or
    ///   resolves (through symlinks) outside the root
    pub fn resolve(&self, storage_path: &str) -> Result<PathBuf> {
        let relative = sanitize_asset_path(storage_path).map_err(|e| match e {
            PathTraversalError::EmptyPath => Error::validation("storagePath required"),
            _ => Error::path_traversal(storage_path),
        })?;
        validate_path_within_base(&self.root, &relative)
            .map_err(|_| Error::path_traversal(storage_path))
    }

    /// Writes `data` as a new asset under today's date partition.
    ///
    /// The file appears atomically and never replaces an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the file cannot be written.
    pub async fn write_new(
        &self,
        extension: &str,
        data: Vec<u8>,
        now: DateTime<Utc>,
    ) -> Result<StoredAsset> {
        let id = Uuid::new_v4().to_string();
        let storage_path = format!("{}/{id}.{extension}", now.format("%Y/%m/%d"));
        let target = self.root.join(&storage_path);
        let size = data.len() as u64;

        tokio::task::spawn_blocking(move || write_file_sync(&target, &data))
            .await
            .context("Task join error")
            .and_then(|result| result)
            .map_err(|e| Error::storage("Failed to write asset", e))?;

        debug!(storage_path = %storage_path, size, "Wrote asset");
        Ok(StoredAsset {
            id,
            storage_path,
            size,
        })
    }

    /// Reads an asset.
    ///
    /// # Errors
    ///
    /// - [`Error::PathTraversal`] / [`Error::Validation`] as for [`resolve`](Self::resolve)
    /// - [`Error::NotFound`] if there is no such file
    /// - [`Error::StorageUnavailable`] for any other I/O failure
    pub async fn read(&self, storage_path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(storage_path)?;
        let result = tokio::task::spawn_blocking(move || read_file_sync(&path))
            .await
            .map_err(|e| Error::storage("Task join error", e))?;

        match result {
            Ok(bytes) => Ok(bytes),
            Err(e) if is_missing(&e) => {
                Err(Error::not_found(format!("asset not found: {storage_path}")))
            },
            Err(e) => Err(Error::storage(
                format!("Failed to read asset {storage_path}"),
                e,
            )),
        }
    }

    /// Removes an asset. Returns `false` if it was already gone.
    ///
    /// # Errors
    ///
    /// - [`Error::PathTraversal`] / [`Error::Validation`] as for [`resolve`](Self::resolve)
    /// - [`Error::StorageUnavailable`] if the file exists but cannot be removed
    pub async fn remove(&self, storage_path: &str) -> Result<bool> {
        let path = self.resolve(storage_path)?;
        let result = tokio::task::spawn_blocking(move || fs::remove_file(path))
            .await
            .map_err(|e| Error::storage("Task join error", e))?;

        match result {
            Ok(()) => {
                debug!(storage_path, "Removed asset");
                Ok(true)
            },
            Err(e) if is_missing(&e) => {
                warn!(storage_path, "Asset already missing");
                Ok(false)
            },
            Err(e) => Err(Error::storage(
                format!("Failed to remove asset {storage_path}"),
                e,
            )),
        }
    }
}

fn is_missing(e: &std::io::Error) -> bool {
    // A path whose parent is a regular file reports NotADirectory; a date
    // partition directory is not an asset either.
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound
            | std::io::ErrorKind::NotADirectory
            | std::io::ErrorKind::IsADirectory
    )
}

/// Reads a regular file. Directories report `IsADirectory` on every platform.
fn read_file_sync(path: &Path) -> std::io::Result<Vec<u8>> {
    if fs::metadata(path)?.is_dir() {
        return Err(std::io::Error::from(std::io::ErrorKind::IsADirectory));
    }
    fs::read(path)
}

fn write_file_sync(target: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = target
        .parent()
        .context("Asset path has no parent directory")?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create asset directory: {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(data).context("Failed to write asset temp file")?;
    tmp.as_file()
        .sync_all()
        .context("Failed to sync asset temp file")?;
    tmp.persist_noclobber(target)
        .with_context(|| format!("Failed to persist asset: {}", target.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store() -> (TempDir, AssetStore) {
        let tmp = TempDir::new().unwrap();
        let assets = AssetStore::open(tmp.path().join("uploads")).unwrap();
        (tmp, assets)
    }

    #[tokio::test]
    async fn test_write_new_uses_date_layout() {
        let (_tmp, assets) = store();
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap();

        let stored = assets.write_new("png", b"PNG".to_vec(), now).await.unwrap();

        assert_eq!(stored.storage_path, format!("2025/03/07/{}.png", stored.id));
        assert_eq!(stored.size, 3);
        assert!(assets.root().join(&stored.storage_path).is_file());
    }

    #[tokio::test]
    async fn test_read_back_and_remove_is_idempotent() {
        let (_tmp, assets) = store();
        let stored = assets
            .write_new("webp", b"data".to_vec(), Utc::now())
            .await
            .unwrap();

        assert_eq!(assets.read(&stored.storage_path).await.unwrap(), b"data");
        assert!(assets.remove(&stored.storage_path).await.unwrap());
        assert!(!assets.remove(&stored.storage_path).await.unwrap());
        assert!(matches!(
            assets.read(&stored.storage_path).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_reads_as_not_found() {
        let (_tmp, assets) = store();
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap();
        assets.write_new("png", b"PNG".to_vec(), now).await.unwrap();

        for dir in ["2025", "2025/03/07"] {
            assert!(
                matches!(assets.read(dir).await, Err(Error::NotFound(_))),
                "{dir} should read as not found"
            );
        }
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let (_tmp, assets) = store();
        for path in ["../db.json", "/etc/passwd", "2025/../../db.json"] {
            assert!(
                matches!(assets.read(path).await, Err(Error::PathTraversal { .. })),
                "{path} should be rejected"
            );
            assert!(matches!(
                assets.remove(path).await,
                Err(Error::PathTraversal { .. })
            ));
        }
    }

    #[test]
    fn test_empty_path_is_validation_error() {
        let (_tmp, assets) = store();
        assert!(matches!(assets.resolve(""), Err(Error::Validation(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_is_rejected() {
        let (tmp, assets) = store();
        let outside = tmp.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("secret.png"), b"secret").unwrap();
        std::os::unix::fs::symlink(&outside, assets.root().join("link")).unwrap();

        assert!(matches!(
            assets.read("link/secret.png").await,
            Err(Error::PathTraversal { .. })
        ));
    }
}
