//! Image model client.
//!
//! [`ImageModel`] is the seam between the gateway and the external model.
//! [`GeminiClient`] talks to the Gemini `generateContent` REST endpoint and
//! asks for image-only output.

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};

/// Image passed to or returned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One model invocation: a text prompt plus, for edits, a source image.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub text: String,
    pub image: Option<ModelImage>,
}

impl ModelRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(text: impl Into<String>, image: ModelImage) -> Self {
        Self {
            text: text.into(),
            image: Some(image),
        }
    }
}

/// Text+image in, image out.
///
/// # Errors
///
/// Implementations return [`Error::Generation`] when the model answers
/// without an image, and [`Error::Upstream`] for transport or API failures.
#[async_trait]
pub trait ImageModel: Send + Sync + 'static {
    async fn generate(&self, request: ModelRequest) -> Result<ModelImage>;

    /// Model name, for logs.
    fn name(&self) -> &str;
}

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiClient {
    /// Builds a client from the `[generation]` config section.
    ///
    /// A missing API key is not an error here; requests fail with a
    /// configuration error instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GenerationConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to create image model HTTP client")?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key: config.api_key(),
            api_key_env: config.api_key_env.clone(),
        })
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn generate(&self, request: ModelRequest) -> Result<ModelImage> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Config(format!("{} is not set", self.api_key_env))
        })?;

        let body = GenerateContentRequest::from(&request);
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("image model request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(Error::upstream(format!(
                "image model returned {status}: {message}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(format!("invalid image model response: {e}")))?;

        let image = parsed.into_image()?;
        debug!(
            model = %self.model,
            mime_type = %image.mime_type,
            bytes = image.data.len(),
            "Image model returned image"
        );
        Ok(image)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationSettings,
}

impl From<&ModelRequest> for GenerateContentRequest {
    fn from(request: &ModelRequest) -> Self {
        let mut parts = vec![Part {
            text: Some(request.text.clone()),
            inline_data: None,
        }];
        if let Some(image) = &request.image {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: image.mime_type.clone(),
                    data: STANDARD.encode(&image.data),
                }),
            });
        }
        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationSettings {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    response_modalities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// First `image/*` inline part of the first candidate.
    fn into_image(self) -> Result<ModelImage> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(Error::generation("model returned no candidates"));
        };
        let finish_reason = candidate.finish_reason;

        let inline = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.inline_data)
            .find(|data| data.mime_type.starts_with("image/") && !data.data.is_empty())
            .ok_or_else(|| {
                Error::generation(match finish_reason {
                    Some(reason) => format!("no image in model response (finish reason {reason})"),
                    None => "no image in model response".to_string(),
                })
            })?;

        let data = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| Error::generation(format!("undecodable image payload: {e}")))?;
        Ok(ModelImage {
            mime_type: inline.mime_type,
            data,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<ModelImage> {
        serde_json::from_value::<GenerateContentResponse>(value)
            .unwrap()
            .into_image()
    }

    #[test]
    fn test_request_asks_for_image_only() {
        let body = serde_json::to_value(GenerateContentRequest::from(&ModelRequest::text("draw")))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "draw" }] }],
                "generationConfig": { "responseModalities": ["IMAGE"] }
            })
        );
    }

    #[test]
    fn test_edit_request_carries_inline_image() {
        let request = ModelRequest::with_image(
            "make it blue",
            ModelImage {
                mime_type: "image/jpeg".to_string(),
                data: b"abc".to_vec(),
            },
        );
        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(
            body["contents"][0]["parts"][1],
            json!({ "inlineData": { "mimeType": "image/jpeg", "data": "YWJj" } })
        );
    }

    #[test]
    fn test_first_image_part_is_extracted() {
        let image = parse(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "here you go" },
                    { "inlineData": { "mimeType": "text/plain", "data": "eA==" } },
                    { "inlineData": { "mimeType": "image/webp", "data": "YWJj" } },
                    { "inlineData": { "mimeType": "image/png", "data": "ZGVm" } }
                ]}
            }]
        }))
        .unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.data, b"abc");
    }

    #[test]
    fn test_missing_image_is_generation_error() {
        let text_only = parse(json!({
            "candidates": [{ "content": { "parts": [{ "text": "sorry" }] }, "finishReason": "SAFETY" }]
        }));
        assert!(matches!(text_only, Err(Error::Generation(msg)) if msg.contains("SAFETY")));

        assert!(matches!(parse(json!({})), Err(Error::Generation(_))));
        assert!(matches!(
            parse(json!({ "candidates": [{}] })),
            Err(Error::Generation(_))
        ));
    }

    #[test]
    fn test_bad_base64_is_generation_error() {
        let result = parse(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "!!not base64!!" } }
            ]}}]
        }));
        assert!(matches!(result, Err(Error::Generation(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let config = GenerationConfig {
            api_key_env: "NOTECRAFT_TEST_UNSET_KEY_VAR".to_string(),
            ..GenerationConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert!(matches!(
            client.generate(ModelRequest::text("x")).await,
            Err(Error::Config(_))
        ));
    }
}
