//! Request and response bodies for generation and edit.

use serde::{Deserialize, Serialize};

/// `POST /api/generate` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub content: String,
    /// Absent means the default theme.
    #[serde(default)]
    pub theme_id: Option<String>,
    /// Absent means `1:1`.
    #[serde(default)]
    pub image_size: Option<String>,
    #[serde(default)]
    pub genre_id: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
}

/// `POST /api/edit` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    #[serde(default)]
    pub storage_path: String,
    #[serde(default)]
    pub instruction: String,
}

/// A generated or edited image as returned to the client.
///
/// `public_url` is absent when the image could not be recorded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    /// Base64 of the image bytes.
    pub image: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}
