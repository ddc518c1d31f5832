//! Generation gateway: validation, model invocation and best-effort recording.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::client::{ImageModel, ModelImage, ModelRequest};
use super::prompt::build_prompt;
use super::types::{EditRequest, GenerateRequest, GeneratedImage};
use crate::assets::{extension_for_mime, mime_for_path};
use crate::catalog::{CatalogService, NewImage};
use crate::constants::EDIT_PROMPT_PREFIX;
use crate::error::{Error, Result};
use crate::presets::{self, DEFAULT_THEME_ID, ImageSize};

/// Metadata recorded alongside a generated asset.
#[derive(Debug, Clone)]
struct RecordMeta {
    prompt: String,
    theme_id: String,
    image_size: String,
    genre_id: Option<String>,
    folder_ids: BTreeSet<String>,
}

/// Turns generate/edit requests into model calls and catalog records.
///
/// The catalog lock is never held while the model runs. Once the model has
/// answered, the asset write and record append run in a spawned task, so a
/// client disconnect cannot stop them halfway.
#[derive(Clone)]
pub struct GenerationService {
    model: Arc<dyn ImageModel>,
    catalog: CatalogService,
    timeout: Duration,
}

impl GenerationService {
    pub fn new(model: Arc<dyn ImageModel>, catalog: CatalogService, timeout: Duration) -> Self {
        Self {
            model,
            catalog,
            timeout,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generates a new memo image.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for blank content and instruction, or an
    ///   unknown theme, size or genre
    /// - [`Error::Generation`] / [`Error::Upstream`] / [`Error::Config`] from
    ///   the model
    /// - [`Error::Timeout`] if the model exceeds the configured timeout
    pub async fn generate(&self, request: GenerateRequest) -> Result<GeneratedImage> {
        let instruction = request
            .instruction
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty());
        if request.content.trim().is_empty() && instruction.is_none() {
            return Err(Error::validation("content or instruction required"));
        }

        let theme_id = request.theme_id.as_deref().unwrap_or(DEFAULT_THEME_ID);
        let theme = presets::find_theme(theme_id)
            .ok_or_else(|| Error::validation(format!("unknown themeId: {theme_id}")))?;

        let size = match request.image_size.as_deref() {
            None => ImageSize::default(),
            Some(id) => ImageSize::from_id(id)
                .ok_or_else(|| Error::validation(format!("unknown imageSize: {id}")))?,
        };

        let genre = match request.genre_id.as_deref() {
            None | Some("") => None,
            Some(id) => Some(
                presets::find_genre(id)
                    .ok_or_else(|| Error::validation(format!("unknown genreId: {id}")))?,
            ),
        };

        let prompt = build_prompt(&request.content, theme, size, instruction, genre);
        let image = self.call_model(ModelRequest::text(prompt)).await?;

        let recorded_prompt = if request.content.trim().is_empty() {
            instruction.unwrap_or_default().to_string()
        } else {
            request.content.clone()
        };
        let meta = RecordMeta {
            prompt: recorded_prompt,
            theme_id: theme.id.to_string(),
            image_size: size.id().to_string(),
            genre_id: genre.map(|g| g.id.to_string()),
            folder_ids: genre
                .and_then(|g| g.folder_id)
                .map(str::to_string)
                .into_iter()
                .collect(),
        };

        Ok(self.finish(image, meta).await)
    }

    /// Edits an existing asset with a free-text instruction.
    ///
    /// The new record inherits theme, size, genre and folders from the
    /// source image's record when there is one.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a missing path or blank instruction
    /// - [`Error::PathTraversal`] if the path leaves the asset root
    /// - [`Error::NotFound`] if the source asset does not exist
    /// - model errors and [`Error::Timeout`] as for [`generate`](Self::generate)
    pub async fn edit(&self, request: EditRequest) -> Result<GeneratedImage> {
        let instruction = request.instruction.trim();
        if request.storage_path.trim().is_empty() || instruction.is_empty() {
            return Err(Error::validation("storagePath and instruction required"));
        }

        let source = self.catalog.assets().read(&request.storage_path).await?;
        let source = ModelImage {
            mime_type: mime_for_path(Path::new(&request.storage_path)).to_string(),
            data: source,
        };

        let original = match self
            .catalog
            .find_by_storage_path(&request.storage_path)
            .await
        {
            Ok(original) => original,
            Err(e) => {
                warn!(error = %e, "Catalog unavailable; edit will use default metadata");
                None
            },
        };

        let image = self
            .call_model(ModelRequest::with_image(instruction, source))
            .await?;

        let meta = match original {
            Some(original) => RecordMeta {
                prompt: format!("{EDIT_PROMPT_PREFIX}{instruction}"),
                theme_id: original.theme_id,
                image_size: original.image_size,
                genre_id: original.genre_id,
                folder_ids: original.folder_ids,
            },
            None => RecordMeta {
                prompt: format!("{EDIT_PROMPT_PREFIX}{instruction}"),
                theme_id: DEFAULT_THEME_ID.to_string(),
                image_size: ImageSize::default().id().to_string(),
                genre_id: None,
                folder_ids: BTreeSet::new(),
            },
        };

        Ok(self.finish(image, meta).await)
    }

    async fn call_model(&self, request: ModelRequest) -> Result<ModelImage> {
        match tokio::time::timeout(self.timeout, self.model.generate(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    model = self.model.name(),
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Image model call timed out"
                );
                Err(Error::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                })
            },
        }
    }

    /// Builds the response and records the image in a detached task.
    async fn finish(&self, image: ModelImage, meta: RecordMeta) -> GeneratedImage {
        let encoded = STANDARD.encode(&image.data);
        let mime_type = image.mime_type.clone();

        let catalog = self.catalog.clone();
        let public_url = match tokio::spawn(record(catalog, image, meta)).await {
            Ok(public_url) => public_url,
            Err(e) => {
                error!(error = %e, "Image recording task failed");
                None
            },
        };

        GeneratedImage {
            image: encoded,
            mime_type,
            public_url,
        }
    }
}

/// Writes the asset and appends its record. Failures are logged, never
/// returned; an asset whose record could not be appended is removed again.
async fn record(catalog: CatalogService, image: ModelImage, meta: RecordMeta) -> Option<String> {
    let now = Utc::now();
    let extension = extension_for_mime(&image.mime_type);

    let stored = match catalog.assets().write_new(extension, image.data, now).await {
        Ok(stored) => stored,
        Err(e) => {
            error!(error = %e, "Failed to store generated image");
            return None;
        },
    };

    let new = NewImage {
        id: stored.id.clone(),
        prompt: meta.prompt,
        theme_id: meta.theme_id,
        image_size: meta.image_size,
        genre_id: meta.genre_id,
        storage_path: stored.storage_path.clone(),
        file_size_bytes: Some(stored.size),
        folder_ids: meta.folder_ids,
        created_at: now,
    };

    match catalog.append_image(new).await {
        Ok(image) => {
            info!(
                image_id = %image.id,
                storage_path = %image.storage_path,
                bytes = stored.size,
                "Recorded generated image"
            );
            Some(image.public_url)
        },
        Err(e) => {
            error!(error = %e, storage_path = %stored.storage_path, "Failed to record generated image");
            if let Err(e) = catalog.assets().remove(&stored.storage_path).await {
                warn!(error = %e, storage_path = %stored.storage_path, "Failed to remove unrecorded asset");
            }
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetStore;
    use crate::catalog::{CatalogStore, FolderFilter, MemoryBackend};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    /// Records requests and answers with a canned result.
    struct FakeModel {
        answer: Mutex<Option<Result<ModelImage>>>,
        delay: Duration,
        requests: Mutex<Vec<ModelRequest>>,
    }

    impl FakeModel {
        fn returning(answer: Result<ModelImage>) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(answer)),
                delay: Duration::ZERO,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn png() -> Arc<Self> {
            Self::returning(Ok(ModelImage {
                mime_type: "image/png".to_string(),
                data: b"PNG-BYTES".to_vec(),
            }))
        }
    }

    #[async_trait]
    impl ImageModel for FakeModel {
        async fn generate(&self, request: ModelRequest) -> Result<ModelImage> {
            self.requests.lock().push(request);
            tokio::time::sleep(self.delay).await;
            self.answer
                .lock()
                .take()
                .unwrap_or_else(|| Err(Error::generation("fake model exhausted")))
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct Harness {
        _tmp: TempDir,
        catalog: CatalogService,
        service: GenerationService,
    }

    fn harness(model: Arc<FakeModel>, store: CatalogStore) -> Harness {
        let tmp = TempDir::new().unwrap();
        let assets = AssetStore::open(tmp.path().join("uploads")).unwrap();
        let catalog = CatalogService::new(store, assets);
        let service = GenerationService::new(model, catalog.clone(), Duration::from_secs(5));
        Harness {
            _tmp: tmp,
            catalog,
            service,
        }
    }

    fn request(content: &str) -> GenerateRequest {
        GenerateRequest {
            content: content.to_string(),
            ..GenerateRequest::default()
        }
    }

    #[tokio::test]
    async fn test_generate_records_image_in_genre_folder() {
        let h = harness(FakeModel::png(), CatalogStore::memory());
        let result = h
            .service
            .generate(GenerateRequest {
                genre_id: Some("toeic".to_string()),
                image_size: Some("16:9".to_string()),
                ..request("apple = りんご")
            })
            .await
            .unwrap();

        assert_eq!(result.image, STANDARD.encode(b"PNG-BYTES"));
        assert_eq!(result.mime_type, "image/png");
        let url = result.public_url.unwrap();

        let page = h
            .catalog
            .list_images(&FolderFilter::Folder("genre-toeic".to_string()), 1, 12)
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        let image = &page.images[0];
        assert_eq!(image.public_url, url);
        assert_eq!(image.prompt, "apple = りんご");
        assert_eq!(image.theme_id, "notebook");
        assert_eq!(image.image_size, "16:9");
        assert_eq!(image.genre_id.as_deref(), Some("toeic"));
        assert_eq!(image.file_size_bytes, Some(9));
        assert!(image.storage_path.ends_with(".png"));
        assert_eq!(
            h.catalog.assets().read(&image.storage_path).await.unwrap(),
            b"PNG-BYTES"
        );
    }

    #[tokio::test]
    async fn test_generate_validates_before_calling_model() {
        let model = FakeModel::png();
        let h = harness(model.clone(), CatalogStore::memory());

        let cases = [
            request("  "),
            GenerateRequest {
                theme_id: Some("neon".to_string()),
                ..request("x")
            },
            GenerateRequest {
                image_size: Some("2:1".to_string()),
                ..request("x")
            },
            GenerateRequest {
                genre_id: Some("astrology".to_string()),
                ..request("x")
            },
        ];
        for case in cases {
            assert!(matches!(
                h.service.generate(case).await,
                Err(Error::Validation(_))
            ));
        }
        assert!(model.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_instruction_alone_is_enough() {
        let model = FakeModel::png();
        let h = harness(model.clone(), CatalogStore::memory());
        let result = h
            .service
            .generate(GenerateRequest {
                instruction: Some("a cat studying".to_string()),
                ..request("")
            })
            .await
            .unwrap();
        assert!(result.public_url.is_some());
        assert!(model.requests.lock()[0].text.contains("a cat studying"));
    }

    #[tokio::test]
    async fn test_model_without_image_is_generation_error() {
        let h = harness(
            FakeModel::returning(Err(Error::generation("no image in model response"))),
            CatalogStore::memory(),
        );
        let err = h.service.generate(request("x")).await.unwrap_err();
        assert!(err.to_string().starts_with("generation failed"));

        let page = h.catalog.list_images(&FolderFilter::All, 1, 12).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_slow_model_times_out() {
        let model = Arc::new(FakeModel {
            answer: Mutex::new(None),
            delay: Duration::from_secs(30),
            requests: Mutex::new(Vec::new()),
        });
        let tmp = TempDir::new().unwrap();
        let catalog = CatalogService::new(
            CatalogStore::memory(),
            AssetStore::open(tmp.path()).unwrap(),
        );
        let service = GenerationService::new(model, catalog, Duration::from_millis(20));

        assert!(matches!(
            service.generate(request("x")).await,
            Err(Error::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_edit_inherits_source_metadata() {
        let model = FakeModel::returning(Ok(ModelImage {
            mime_type: "image/jpeg".to_string(),
            data: b"JPEG".to_vec(),
        }));
        let h = harness(model.clone(), CatalogStore::memory());

        let math = h.catalog.create_folder("Math").await.unwrap().folder.id;
        let stored = h
            .catalog
            .assets()
            .write_new("webp", b"SRC".to_vec(), Utc::now())
            .await
            .unwrap();
        h.catalog
            .append_image(NewImage {
                id: stored.id.clone(),
                prompt: "orig".to_string(),
                theme_id: "blackboard".to_string(),
                image_size: "9:16".to_string(),
                genre_id: Some("takken".to_string()),
                storage_path: stored.storage_path.clone(),
                file_size_bytes: Some(3),
                folder_ids: BTreeSet::from([math.clone()]),
                created_at: Utc::now() - chrono::Duration::minutes(1),
            })
            .await
            .unwrap();

        let result = h
            .service
            .edit(EditRequest {
                storage_path: stored.storage_path.clone(),
                instruction: "  make it blue ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(result.mime_type, "image/jpeg");

        let sent = model.requests.lock()[0].clone();
        assert_eq!(sent.text, "make it blue");
        let sent_image = sent.image.unwrap();
        assert_eq!(sent_image.mime_type, "image/webp");
        assert_eq!(sent_image.data, b"SRC");

        let page = h.catalog.list_images(&FolderFilter::All, 1, 1).await.unwrap();
        let edited = &page.images[0];
        assert_eq!(edited.prompt, "[edit] make it blue");
        assert_eq!(edited.theme_id, "blackboard");
        assert_eq!(edited.image_size, "9:16");
        assert_eq!(edited.genre_id.as_deref(), Some("takken"));
        assert_eq!(edited.folder_ids, BTreeSet::from([math]));
        assert!(edited.storage_path.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_edit_of_unrecorded_asset_uses_defaults() {
        let h = harness(FakeModel::png(), CatalogStore::memory());
        let stored = h
            .catalog
            .assets()
            .write_new("png", b"SRC".to_vec(), Utc::now())
            .await
            .unwrap();

        h.service
            .edit(EditRequest {
                storage_path: stored.storage_path,
                instruction: "fix typo".to_string(),
            })
            .await
            .unwrap();

        let page = h.catalog.list_images(&FolderFilter::All, 1, 12).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.images[0].theme_id, "notebook");
        assert_eq!(page.images[0].image_size, "1:1");
        assert!(page.images[0].folder_ids.is_empty());
    }

    #[tokio::test]
    async fn test_edit_errors() {
        let h = harness(FakeModel::png(), CatalogStore::memory());

        let missing = h
            .service
            .edit(EditRequest {
                storage_path: "2025/01/01/nope.png".to_string(),
                instruction: "x".to_string(),
            })
            .await;
        assert!(matches!(missing, Err(Error::NotFound(_))));

        let escape = h
            .service
            .edit(EditRequest {
                storage_path: "../db.json".to_string(),
                instruction: "x".to_string(),
            })
            .await;
        assert!(matches!(escape, Err(Error::PathTraversal { .. })));

        let blank = h
            .service
            .edit(EditRequest {
                storage_path: "a.png".to_string(),
                instruction: "   ".to_string(),
            })
            .await;
        assert!(matches!(blank, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_failed_append_still_returns_image_and_removes_asset() {
        // A document that cannot be parsed makes every catalog write fail.
        let h = harness(
            FakeModel::png(),
            CatalogStore::custom(MemoryBackend::with_document("not json")),
        );

        let result = h.service.generate(request("x")).await.unwrap();
        assert_eq!(result.image, STANDARD.encode(b"PNG-BYTES"));
        assert!(result.public_url.is_none());

        let leftover = walk_files(h.catalog.assets().root());
        assert!(leftover.is_empty(), "unexpected files: {leftover:?}");
    }

    fn walk_files(dir: &Path) -> Vec<std::path::PathBuf> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                files.extend(walk_files(&path));
            } else {
                files.push(path);
            }
        }
        files
    }
}
