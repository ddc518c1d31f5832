//! Request and response bodies for the catalog API.

use serde::{Deserialize, Serialize};

use crate::catalog::{FolderSummary, MoveAction};

/// `GET /api/images` query string.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListImagesQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    /// Absent for all images, `none` for uncategorized, else a folder id.
    pub folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteImageRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoveImagesRequest {
    #[serde(default)]
    pub image_ids: Vec<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Absent means `add`.
    #[serde(default)]
    pub action: Option<MoveAction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateFolderRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenameFolderRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteFolderRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FoldersResponse {
    pub folders: Vec<FolderSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FolderResponse {
    pub folder: FolderSummary,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
