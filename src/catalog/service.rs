//! Catalog query and mutation service.
//!
//! Combines the [`CatalogStore`] with the [`AssetStore`] so image deletion can
//! remove the record and its file as one unit.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::store::CatalogStore;
use super::types::{FolderFilter, FolderSummary, Image, ImagePage, MoveAction, NewImage};
use crate::assets::AssetStore;
use crate::error::{Error, Result};

/// Catalog operations used by the HTTP layer and the generation gateway.
///
/// Every mutation runs inside one [`CatalogTxn`](super::CatalogTxn), so
/// overlapping requests are applied one after the other.
#[derive(Clone)]
pub struct CatalogService {
    store: CatalogStore,
    assets: AssetStore,
}

impl CatalogService {
    pub fn new(store: CatalogStore, assets: AssetStore) -> Self {
        Self { store, assets }
    }

    #[must_use]
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    #[must_use]
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Lists one page of images, newest first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for `page == 0` or `limit == 0`, or a
    /// storage error if the catalog cannot be loaded.
    pub async fn list_images(
        &self,
        filter: &FolderFilter,
        page: usize,
        limit: usize,
    ) -> Result<ImagePage> {
        self.store.load().await?.list_images(filter, page, limit)
    }

    /// Looks up the record that owns `storage_path`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the catalog cannot be loaded.
    pub async fn find_by_storage_path(&self, storage_path: &str) -> Result<Option<Image>> {
        Ok(self
            .store
            .load()
            .await?
            .find_by_storage_path(storage_path)
            .cloned())
    }

    /// Deletes an image record and its asset.
    ///
    /// A missing asset file is not an error, and neither is a stored path
    /// that does not name a file under the asset root (nothing to remove).
    /// If the asset cannot be removed for any other reason the record is kept.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown id, or a storage error.
    pub async fn delete_image(&self, id: &str) -> Result<Image> {
        let mut txn = self.store.begin_write().await?;
        let image = txn.remove_image(id)?;
        match self.assets.remove(&image.storage_path).await {
            Ok(_) => {},
            Err(e @ (Error::Validation(_) | Error::PathTraversal { .. })) => {
                warn!(
                    image_id = %image.id,
                    storage_path = %image.storage_path,
                    error = %e,
                    "Stored path is not an asset; deleting record only"
                );
            },
            Err(e) => return Err(e),
        }
        txn.commit().await?;

        info!(image_id = %image.id, storage_path = %image.storage_path, "Deleted image");
        Ok(image)
    }

    /// Appends a record for a freshly written asset.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id or storage path is taken, or a
    /// storage error.
    pub async fn append_image(&self, new: NewImage) -> Result<Image> {
        let mut txn = self.store.begin_write().await?;
        let image = txn.push_image(new)?.clone();
        txn.commit().await?;

        debug!(image_id = %image.id, folders = image.folder_ids.len(), "Recorded image");
        Ok(image)
    }

    /// Lists all folders with their image counts.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the catalog cannot be loaded.
    pub async fn list_folders(&self) -> Result<Vec<FolderSummary>> {
        Ok(self.store.load().await?.folder_summaries())
    }

    /// Creates a folder.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, or a storage error.
    pub async fn create_folder(&self, name: &str) -> Result<FolderSummary> {
        let mut txn = self.store.begin_write().await?;
        let folder = txn.create_folder(name, Utc::now())?;
        txn.commit().await?;

        info!(folder_id = %folder.id, name = %folder.name, "Created folder");
        Ok(FolderSummary {
            folder,
            image_count: 0,
        })
    }

    /// Renames a folder.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, not-found for an unknown
    /// id, or a storage error.
    pub async fn rename_folder(&self, id: &str, name: &str) -> Result<FolderSummary> {
        let mut txn = self.store.begin_write().await?;
        txn.rename_folder(id, name)?;
        let summary = txn.folder_summary(id)?;
        txn.commit().await?;

        info!(folder_id = id, name = %summary.folder.name, "Renamed folder");
        Ok(summary)
    }

    /// Deletes a folder, detaching it from every image.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown id, or a storage error.
    pub async fn delete_folder(&self, id: &str) -> Result<usize> {
        let mut txn = self.store.begin_write().await?;
        let detached = txn.delete_folder(id)?;
        txn.commit().await?;

        info!(folder_id = id, detached, "Deleted folder");
        Ok(detached)
    }

    /// Changes the folder membership of several images.
    ///
    /// # Errors
    ///
    /// See [`Snapshot::move_images`](super::Snapshot::move_images); also a
    /// storage error.
    pub async fn move_images(
        &self,
        image_ids: &[String],
        folder_id: Option<&str>,
        action: MoveAction,
    ) -> Result<usize> {
        let mut txn = self.store.begin_write().await?;
        let changed = txn.move_images(image_ids, folder_id, action)?;
        if changed > 0 {
            txn.commit().await?;
        }

        debug!(
            requested = image_ids.len(),
            changed,
            ?action,
            folder_id,
            "Moved images"
        );
        Ok(changed)
    }
}
