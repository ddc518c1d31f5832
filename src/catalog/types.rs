//! Record types for the image catalog.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::constants::UPLOADS_URL_PREFIX;

/// A generated image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub id: String,
    pub prompt: String,
    pub theme_id: String,
    pub image_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<String>,
    pub storage_path: String,
    pub public_url: String,
    pub file_size_bytes: Option<u64>,
    /// Folders this image belongs to. Empty means uncategorized.
    #[serde(default)]
    pub folder_ids: BTreeSet<String>,
    pub created_at: String,
    /// Fields this version does not know about, preserved on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    /// Parsed creation time. `None` for timestamps that are not RFC 3339.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    #[must_use]
    pub fn is_uncategorized(&self) -> bool {
        self.folder_ids.is_empty()
    }

    #[must_use]
    pub fn in_folder(&self, folder_id: &str) -> bool {
        self.folder_ids.contains(folder_id)
    }
}

/// A folder as persisted. `image_count` is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Folder {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: String) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at,
            extra: Map::new(),
        }
    }
}

/// A folder annotated with the number of images that reference it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FolderSummary {
    #[serde(flatten)]
    pub folder: Folder,
    pub image_count: usize,
}

/// The whole persisted catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// Which images a listing covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FolderFilter {
    #[default]
    All,
    /// Images with no folder at all.
    Uncategorized,
    Folder(String),
}

impl FolderFilter {
    /// Wire value selecting uncategorized images.
    pub const UNCATEGORIZED: &'static str = "none";

    /// Parse the `folder_id` query parameter: absent or empty means all.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::All,
            Some(Self::UNCATEGORIZED) => Self::Uncategorized,
            Some(id) => Self::Folder(id.to_string()),
        }
    }

    #[must_use]
    pub fn matches(&self, image: &Image) -> bool {
        match self {
            Self::All => true,
            Self::Uncategorized => image.is_uncategorized(),
            Self::Folder(id) => image.in_folder(id),
        }
    }
}

/// One page of an image listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImagePage {
    pub images: Vec<Image>,
    pub total: usize,
    pub has_more: bool,
}

/// Folder membership change applied by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAction {
    #[default]
    Add,
    Remove,
    Clear,
}

/// Data for an image record that is about to be appended.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub id: String,
    pub prompt: String,
    pub theme_id: String,
    pub image_size: String,
    pub genre_id: Option<String>,
    pub storage_path: String,
    pub file_size_bytes: Option<u64>,
    pub folder_ids: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NewImage> for Image {
    fn from(new: NewImage) -> Self {
        Self {
            public_url: public_url(&new.storage_path),
            id: new.id,
            prompt: new.prompt,
            theme_id: new.theme_id,
            image_size: new.image_size,
            genre_id: new.genre_id,
            storage_path: new.storage_path,
            file_size_bytes: new.file_size_bytes,
            folder_ids: new.folder_ids,
            created_at: format_timestamp(new.created_at),
            extra: Map::new(),
        }
    }
}

/// Public URL an asset is served under.
#[must_use]
pub fn public_url(storage_path: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}{storage_path}")
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_folder_filter_from_query() {
        assert_eq!(FolderFilter::from_query(None), FolderFilter::All);
        assert_eq!(FolderFilter::from_query(Some("")), FolderFilter::All);
        assert_eq!(
            FolderFilter::from_query(Some("none")),
            FolderFilter::Uncategorized
        );
        assert_eq!(
            FolderFilter::from_query(Some("genre-toeic")),
            FolderFilter::Folder("genre-toeic".to_string())
        );
    }

    #[test]
    fn test_timestamp_format_matches_iso_millis() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(format_timestamp(ts), "2025-03-07T09:05:01.000Z");
    }

    #[test]
    fn test_new_image_derives_public_url() {
        let image: Image = NewImage {
            id: "abc".to_string(),
            prompt: "p".to_string(),
            theme_id: "notebook".to_string(),
            image_size: "1:1".to_string(),
            genre_id: None,
            storage_path: "2025/03/07/abc.png".to_string(),
            file_size_bytes: Some(3),
            folder_ids: BTreeSet::new(),
            created_at: Utc::now(),
        }
        .into();
        assert_eq!(image.public_url, "/api/uploads/2025/03/07/abc.png");
        assert!(image.created_at_utc().is_some());
    }

    #[test]
    fn test_folder_summary_serializes_flat() {
        let summary = FolderSummary {
            folder: Folder::new("f1", "Math", "2025-01-01T00:00:00.000Z".to_string()),
            image_count: 2,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], "f1");
        assert_eq!(json["name"], "Math");
        assert_eq!(json["image_count"], 2);
    }

    #[test]
    fn test_image_page_uses_has_more_key() {
        let page = ImagePage {
            images: vec![],
            total: 0,
            has_more: false,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["hasMore"], false);
    }
}
