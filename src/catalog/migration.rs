//! Versioned load of persisted catalog documents.
//!
//! Two historical image shapes exist on disk:
//!
//! - **v1**: a single nullable `folder_id`
//! - **v2** (current): an array-valued `folder_ids`
//!
//! [`upgrade`] parses either shape through [`RawSnapshot`] and produces the
//! current [`Snapshot`]; nothing above the store ever sees the v1 shape.
//! [`provision_genre_folders`] then ensures one folder per genre mapping.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

use super::types::{Folder, Image, Snapshot, format_timestamp, public_url};
use crate::presets;

/// Persisted document before migration.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSnapshot {
    #[serde(default)]
    images: Vec<RawImage>,
    #[serde(default)]
    folders: Vec<RawFolder>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    id: String,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    theme_id: String,
    #[serde(default)]
    image_size: String,
    #[serde(default)]
    genre_id: Option<String>,
    storage_path: String,
    #[serde(default)]
    public_url: Option<String>,
    #[serde(default)]
    file_size_bytes: Option<u64>,
    /// v2 field. Kept as raw JSON: only an array counts as present.
    #[serde(default)]
    folder_ids: Option<Value>,
    /// v1 field. Only a non-empty string names a folder.
    #[serde(default)]
    folder_id: Option<Value>,
    #[serde(default)]
    created_at: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawFolder {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    created_at: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// What a load had to change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Images upgraded from the v1 `folder_id` shape.
    pub upgraded_images: usize,
    /// Genre folders created because they were missing.
    pub provisioned_folders: usize,
}

impl MigrationReport {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.upgraded_images > 0 || self.provisioned_folders > 0
    }
}

impl RawImage {
    /// Returns the upgraded image and whether the v1 shape was found.
    fn into_current(self) -> (Image, bool) {
        let (folder_ids, upgraded) = match self.folder_ids {
            Some(Value::Array(values)) => (
                values
                    .into_iter()
                    .filter_map(|value| match value {
                        Value::String(id) if !id.is_empty() => Some(id),
                        _ => None,
                    })
                    .collect::<BTreeSet<_>>(),
                false,
            ),
            _ => (
                match self.folder_id {
                    Some(Value::String(id)) if !id.is_empty() => BTreeSet::from([id]),
                    _ => BTreeSet::new(),
                },
                true,
            ),
        };

        let image = Image {
            public_url: self
                .public_url
                .unwrap_or_else(|| public_url(&self.storage_path)),
            id: self.id,
            prompt: self.prompt,
            theme_id: self.theme_id,
            image_size: self.image_size,
            genre_id: self.genre_id,
            storage_path: self.storage_path,
            file_size_bytes: self.file_size_bytes,
            folder_ids,
            created_at: self.created_at,
            extra: self.extra,
        };
        (image, upgraded)
    }
}

impl From<RawFolder> for Folder {
    fn from(raw: RawFolder) -> Self {
        let mut extra = raw.extra;
        // Counts are derived on read; drop any that leaked into storage.
        extra.remove("image_count");
        Self {
            id: raw.id,
            name: raw.name,
            created_at: raw.created_at,
            extra,
        }
    }
}

/// Convert a raw document into the current shape.
pub(crate) fn upgrade(raw: RawSnapshot) -> (Snapshot, MigrationReport) {
    let mut report = MigrationReport::default();
    let images = raw
        .images
        .into_iter()
        .map(|raw_image| {
            let (image, upgraded) = raw_image.into_current();
            if upgraded {
                report.upgraded_images += 1;
            }
            image
        })
        .collect();
    let folders = raw.folders.into_iter().map(Folder::from).collect();
    (Snapshot { images, folders }, report)
}

/// Parse a persisted document (any historical shape) into the current shape.
pub(crate) fn parse_document(bytes: &[u8]) -> serde_json::Result<(Snapshot, MigrationReport)> {
    let raw: RawSnapshot = serde_json::from_slice(bytes)?;
    Ok(upgrade(raw))
}

/// Append every missing genre folder. Never duplicates, never removes.
///
/// Returns the number of folders created.
pub fn provision_genre_folders(snapshot: &mut Snapshot, now: DateTime<Utc>) -> usize {
    let existing: HashSet<&str> = snapshot.folders.iter().map(|f| f.id.as_str()).collect();
    let missing: Vec<Folder> = presets::genre_folders()
        .filter(|(_, folder_id)| !existing.contains(folder_id))
        .map(|(genre, folder_id)| Folder::new(folder_id, genre.name, format_timestamp(now)))
        .collect();

    let created = missing.len();
    snapshot.folders.extend(missing);
    created
}
