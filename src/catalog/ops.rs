//! Query and mutation operations over an in-memory [`Snapshot`].
//!
//! These are pure: they never touch storage. [`CatalogService`](super::CatalogService)
//! runs them inside a [`CatalogTxn`](super::CatalogTxn) and persists the result.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use super::types::{
    Folder, FolderFilter, FolderSummary, Image, ImagePage, MoveAction, NewImage, Snapshot,
    format_timestamp,
};
use crate::error::{Error, Result};

impl Snapshot {
    /// One page of images matching `filter`, newest first.
    ///
    /// Records whose `created_at` does not parse sort after all others.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `page` or `limit` is zero.
    pub fn list_images(&self, filter: &FolderFilter, page: usize, limit: usize) -> Result<ImagePage> {
        if page == 0 {
            return Err(Error::validation("page must be at least 1"));
        }
        if limit == 0 {
            return Err(Error::validation("limit must be at least 1"));
        }

        let mut matching: Vec<&Image> = self
            .images
            .iter()
            .filter(|image| filter.matches(image))
            .collect();
        matching.sort_by_cached_key(|image| std::cmp::Reverse(image.created_at_utc()));

        let total = matching.len();
        let offset = (page - 1).saturating_mul(limit);
        let images = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(ImagePage {
            images,
            total,
            has_more: total > offset.saturating_add(limit),
        })
    }

    #[must_use]
    pub fn find_image(&self, id: &str) -> Option<&Image> {
        self.images.iter().find(|image| image.id == id)
    }

    #[must_use]
    pub fn find_by_storage_path(&self, storage_path: &str) -> Option<&Image> {
        self.images
            .iter()
            .find(|image| image.storage_path == storage_path)
    }

    #[must_use]
    pub fn find_folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == id)
    }

    /// Appends a new image record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the id or storage path is already
    /// recorded.
    pub fn push_image(&mut self, new: NewImage) -> Result<&Image> {
        if self.find_image(&new.id).is_some() {
            return Err(Error::validation(format!("image id already exists: {}", new.id)));
        }
        if self.find_by_storage_path(&new.storage_path).is_some() {
            return Err(Error::validation(format!(
                "storage path already recorded: {}",
                new.storage_path
            )));
        }
        // Only reference folders that exist.
        let mut new = new;
        new.folder_ids
            .retain(|id| self.folders.iter().any(|folder| &folder.id == id));

        self.images.push(new.into());
        Ok(&self.images[self.images.len() - 1])
    }

    /// Removes an image record and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no image has this id.
    pub fn remove_image(&mut self, id: &str) -> Result<Image> {
        let index = self
            .images
            .iter()
            .position(|image| image.id == id)
            .ok_or_else(|| Error::not_found(format!("image not found: {id}")))?;
        Ok(self.images.remove(index))
    }

    /// All folders sorted by name, each with its image count.
    #[must_use]
    pub fn folder_summaries(&self) -> Vec<FolderSummary> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for image in &self.images {
            for folder_id in &image.folder_ids {
                *counts.entry(folder_id.as_str()).or_default() += 1;
            }
        }

        let mut summaries: Vec<FolderSummary> = self
            .folders
            .iter()
            .map(|folder| FolderSummary {
                image_count: counts.get(folder.id.as_str()).copied().unwrap_or(0),
                folder: folder.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| {
            a.folder
                .name
                .to_lowercase()
                .cmp(&b.folder.name.to_lowercase())
                .then_with(|| a.folder.name.cmp(&b.folder.name))
        });
        summaries
    }

    /// Summary of one folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no folder has this id.
    pub fn folder_summary(&self, id: &str) -> Result<FolderSummary> {
        let folder = self
            .find_folder(id)
            .ok_or_else(|| Error::not_found(format!("folder not found: {id}")))?;
        Ok(FolderSummary {
            folder: folder.clone(),
            image_count: self.images.iter().filter(|image| image.in_folder(id)).count(),
        })
    }

    /// Creates a user folder with a random id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the trimmed name is empty.
    pub fn create_folder(&mut self, name: &str, now: DateTime<Utc>) -> Result<Folder> {
        let name = required_name(name)?;
        let folder = Folder::new(Uuid::new_v4().to_string(), name, format_timestamp(now));
        self.folders.push(folder.clone());
        Ok(folder)
    }

    /// Renames a folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the trimmed name is empty, or
    /// [`Error::NotFound`] if no folder has this id.
    pub fn rename_folder(&mut self, id: &str, name: &str) -> Result<Folder> {
        let name = required_name(name)?;
        let folder = self
            .folders
            .iter_mut()
            .find(|folder| folder.id == id)
            .ok_or_else(|| Error::not_found(format!("folder not found: {id}")))?;
        folder.name = name.to_string();
        Ok(folder.clone())
    }

    /// Deletes a folder and strips it from every image.
    ///
    /// Returns the number of images that referenced the folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no folder has this id.
    pub fn delete_folder(&mut self, id: &str) -> Result<usize> {
        let index = self
            .folders
            .iter()
            .position(|folder| folder.id == id)
            .ok_or_else(|| Error::not_found(format!("folder not found: {id}")))?;
        self.folders.remove(index);

        let mut detached = 0;
        for image in &mut self.images {
            if image.folder_ids.remove(id) {
                detached += 1;
            }
        }
        Ok(detached)
    }

    /// Changes folder membership of the listed images.
    ///
    /// Unknown image ids are skipped. Returns the number of images whose
    /// membership actually changed.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `image_ids` is empty, or `folder_id` is
    ///   missing for `add`/`remove`
    /// - [`Error::NotFound`] if `add` targets a folder that does not exist
    pub fn move_images(
        &mut self,
        image_ids: &[String],
        folder_id: Option<&str>,
        action: MoveAction,
    ) -> Result<usize> {
        if image_ids.is_empty() {
            return Err(Error::validation("imageIds required"));
        }

        let folder_id = match action {
            MoveAction::Clear => None,
            MoveAction::Add | MoveAction::Remove => {
                let id = folder_id
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| Error::validation("folderId required"))?;
                if action == MoveAction::Add && self.find_folder(id).is_none() {
                    return Err(Error::not_found(format!("folder not found: {id}")));
                }
                Some(id)
            },
        };

        let mut changed = 0;
        for image in self
            .images
            .iter_mut()
            .filter(|image| image_ids.contains(&image.id))
        {
            let did_change = match (action, folder_id) {
                (MoveAction::Add, Some(id)) => image.folder_ids.insert(id.to_string()),
                (MoveAction::Remove, Some(id)) => image.folder_ids.remove(id),
                _ => {
                    let had_any = !image.folder_ids.is_empty();
                    image.folder_ids.clear();
                    had_any
                },
            };
            if did_change {
                changed += 1;
            }
        }
        Ok(changed)
    }
}

fn required_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("folder name required"));
    }
    Ok(name)
}
