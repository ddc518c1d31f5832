//! Redb-backed catalog backend.
//!
//! Keeps the snapshot document under a single key in an embedded redb
//! database. Every write is one ACID transaction, so a crash mid-save leaves
//! the previous snapshot intact.

use super::backend::CatalogBackend;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Table holding the catalog document.
const CATALOG_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("catalog");

/// Key of the snapshot document inside [`CATALOG_TABLE`].
const SNAPSHOT_KEY: &str = "snapshot";

/// Redb-backed catalog backend.
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created (permissions, disk full, etc.)
    /// - Initialization transaction fails to begin or commit
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create catalog directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open catalog database: {}", path.display()))?;

        // Initialize table on first open so reads never hit a missing table
        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(CATALOG_TABLE)
                .context("Failed to initialize catalog table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read_sync(&self) -> Result<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(CATALOG_TABLE)
            .context("Failed to open catalog table")?;
        let document = table
            .get(SNAPSHOT_KEY)
            .context("Failed to read catalog snapshot")?
            .map(|guard| guard.value().to_vec());
        Ok(document)
    }

    fn write_sync(&self, document: &[u8]) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(CATALOG_TABLE)
                .context("Failed to open catalog table")?;
            table
                .insert(SNAPSHOT_KEY, document)
                .context("Failed to write catalog snapshot")?;
        }
        write_txn
            .commit()
            .context("Failed to commit catalog snapshot")?;
        Ok(())
    }
}

#[async_trait]
impl CatalogBackend for RedbBackend {
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
        "redb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_database_reads_none() {
        let tmp = TempDir::new().unwrap();
        let backend = RedbBackend::open(tmp.path().join("catalog.redb")).unwrap();
        assert!(backend.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_document_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.redb");
        {
            let backend = RedbBackend::open(&path).unwrap();
            backend.write(b"{\"images\":[]}".to_vec()).await.unwrap();
        }
        let backend = RedbBackend::open(&path).unwrap();
        assert_eq!(backend.read().await.unwrap().unwrap(), b"{\"images\":[]}");
    }
}
