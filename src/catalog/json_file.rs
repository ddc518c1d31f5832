//! JSON file catalog backend.
//!
//! Stores the snapshot as a single pretty-printed JSON file. Saves go to a
//! temporary file in the same directory which is then renamed over the
//! target, so readers never observe a half-written file.

use super::backend::CatalogBackend;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// JSON file catalog backend.
#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Creates a backend for the file at `path`, creating parent directories.
    ///
    /// The file itself is not created until the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create catalog directory: {}", parent.display())
            })?;
        }
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_sync(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read catalog: {}", self.path.display())),
        }
    }

    fn write_sync(&self, document: &[u8]) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(document)
            .context("Failed to write catalog temp file")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to sync catalog temp file")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace catalog: {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl CatalogBackend for JsonFileBackend {
    async fn read(&self) -> Result<Option<Vec<u8>>> {
        let backend = self.clone();
        tokio::task::spawn_blocking(move || backend.read_sync())
            .await
            .context("Task join error")?
    }

    async fn write(&self, document: Vec<u8>) -> Result<()> {
        let backend = self.clone();
        tokio::task::spawn_blocking(move || backend.write_sync(&document))
            .await
            .context("Task join error")?
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
