//! High-level `CatalogStore` over backend implementations.
//!
//! The store turns the backend's raw document into a current-shape
//! [`Snapshot`] (migrating legacy records and provisioning genre folders on
//! every load) and serializes all writers.

use chrono::Utc;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::backend::CatalogBackend;
use super::json_file::JsonFileBackend;
use super::memory::MemoryBackend;
use super::migration::{MigrationReport, parse_document, provision_genre_folders};
use super::redb::RedbBackend;
use super::types::Snapshot;
use crate::error::{Error, Result};

/// Catalog snapshot store.
///
/// # Concurrency
///
/// Every read-modify-write goes through [`CatalogStore::begin_write`], which
/// holds a single async mutex from load to [`CatalogTxn::commit`], so two
/// overlapping mutations can never lose each other's changes. Plain
/// [`CatalogStore::load`] does not take the lock: backends replace the
/// document atomically, so a reader sees either the old or the new snapshot.
///
/// `CatalogStore` is `Clone`; clones share the backend and the writer lock.
///
/// # Example
///
/// ```ignore
/// let store = CatalogStore::memory();
/// let mut txn = store.begin_write().await?;
/// txn.create_folder("Math", Utc::now())?;
/// txn.commit().await?;
/// ```
#[derive(Clone)]
pub struct CatalogStore {
    backend: Arc<dyn CatalogBackend>,
    writer: Arc<Mutex<()>>,
}

impl CatalogStore {
    /// Creates a store backed by a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self::custom(JsonFileBackend::open(path)?))
    }

    /// Creates a store backed by a redb database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn redb<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self::custom(RedbBackend::open(path)?))
    }

    /// Creates a store backed by process memory. All data is lost on exit.
    pub fn memory() -> Self {
        Self::custom(MemoryBackend::new())
    }

    /// Creates a store with a custom backend.
    pub fn custom<B: CatalogBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Name of the backend, for logs.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Loads the current snapshot.
    ///
    /// Initializes and persists an empty catalog (with genre folders) if none
    /// exists. Legacy records are upgraded and missing genre folders are
    /// added; if that changed anything, the result is persisted once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the backend fails or the
    /// persisted document cannot be parsed.
    pub async fn load(&self) -> Result<Snapshot> {
        if let Some((snapshot, report)) = self.read_current().await?
            && !report.changed()
        {
            return Ok(snapshot);
        }

        let _guard = self.writer.lock().await;
        self.load_locked().await
    }

    /// Replaces the persisted snapshot.
    ///
    /// Must not be called while a [`CatalogTxn`] is alive on the same task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the write fails.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let _guard = self.writer.lock().await;
        self.write_snapshot(snapshot).await
    }

    /// Starts a read-modify-write unit.
    ///
    /// The returned transaction derefs to the loaded [`Snapshot`]. Changes
    /// are persisted by [`CatalogTxn::commit`]; dropping the transaction
    /// discards them. Other writers wait until the transaction ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the snapshot cannot be loaded.
    pub async fn begin_write(&self) -> Result<CatalogTxn<'_>> {
        let guard = self.writer.lock().await;
        let snapshot = self.load_locked().await?;
        Ok(CatalogTxn {
            store: self,
            _guard: guard,
            snapshot,
        })
    }

    /// Reads and upgrades the persisted document, if there is one.
    async fn read_current(&self) -> Result<Option<(Snapshot, MigrationReport)>> {
        let Some(document) = self
            .backend
            .read()
            .await
            .map_err(|e| Error::storage("Failed to read catalog", e))?
        else {
            return Ok(None);
        };

        let (mut snapshot, mut report) = parse_document(&document)
            .map_err(|e| Error::storage("Catalog document is corrupt", e))?;
        report.provisioned_folders = provision_genre_folders(&mut snapshot, Utc::now());
        Ok(Some((snapshot, report)))
    }

    /// Load path for callers holding the writer lock. Persists any
    /// initialization or migration it performs.
    async fn load_locked(&self) -> Result<Snapshot> {
        match self.read_current().await? {
            Some((snapshot, report)) => {
                if report.changed() {
                    self.write_snapshot(&snapshot).await?;
                    info!(
                        backend = self.backend.name(),
                        upgraded_images = report.upgraded_images,
                        provisioned_folders = report.provisioned_folders,
                        "Migrated catalog"
                    );
                }
                Ok(snapshot)
            },
            None => {
                let mut snapshot = Snapshot::default();
                let provisioned = provision_genre_folders(&mut snapshot, Utc::now());
                self.write_snapshot(&snapshot).await?;
                info!(
                    backend = self.backend.name(),
                    genre_folders = provisioned,
                    "Initialized empty catalog"
                );
                Ok(snapshot)
            },
        }
    }

    async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let document = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| Error::storage("Failed to serialize catalog", e))?;
        let bytes = document.len();
        self.backend
            .write(document)
            .await
            .map_err(|e| Error::storage("Failed to save catalog", e))?;
        debug!(
            backend = self.backend.name(),
            bytes,
            images = snapshot.images.len(),
            folders = snapshot.folders.len(),
            "Saved catalog"
        );
        Ok(())
    }
}

/// An in-progress read-modify-write of the catalog.
///
/// Holds the store's writer lock until committed or dropped.
pub struct CatalogTxn<'a> {
    store: &'a CatalogStore,
    _guard: MutexGuard<'a, ()>,
    snapshot: Snapshot,
}

impl CatalogTxn<'_> {
    /// Persists the modified snapshot and releases the writer lock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the write fails; the
    /// persisted catalog is then unchanged.
    pub async fn commit(self) -> Result<()> {
        self.store.write_snapshot(&self.snapshot).await
    }
}

impl Deref for CatalogTxn<'_> {
    type Target = Snapshot;

    fn deref(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl DerefMut for CatalogTxn<'_> {
    fn deref_mut(&mut self) -> &mut Snapshot {
        &mut self.snapshot
    }
}
