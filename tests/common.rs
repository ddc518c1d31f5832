//! Shared harness for HTTP integration tests.
//!
//! `TestApp` wires the real router to an in-memory catalog, a temporary asset
//! directory and a scripted image model, and drives it with
//! `tower::ServiceExt::oneshot` (no sockets).

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use notecraft::assets::AssetStore;
use notecraft::catalog::{CatalogService, CatalogStore};
use notecraft::generation::{GenerationService, ImageModel, ModelImage, ModelRequest};
use notecraft::http::{AppState, router};
use notecraft::{Error, Result};

/// Bytes every successful fake generation returns.
pub const FAKE_PNG: &[u8] = b"\x89PNG fake image";

/// How the fake model answers.
#[derive(Clone, Copy)]
pub enum ModelBehavior {
    Png,
    NoImage,
    Hang,
}

pub struct FakeModel {
    behavior: ModelBehavior,
    pub requests: Mutex<Vec<ModelRequest>>,
}

#[async_trait]
impl ImageModel for FakeModel {
    async fn generate(&self, request: ModelRequest) -> Result<ModelImage> {
        self.requests.lock().unwrap().push(request);
        match self.behavior {
            ModelBehavior::Png => Ok(ModelImage {
                mime_type: "image/png".to_string(),
                data: FAKE_PNG.to_vec(),
            }),
            ModelBehavior::NoImage => Err(Error::generation("no image in model response")),
            ModelBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(Error::generation("unreachable"))
            },
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub struct TestApp {
    pub router: Router,
    pub catalog: CatalogService,
    pub model: Arc<FakeModel>,
    _tmp: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_model(ModelBehavior::Png)
    }

    pub fn with_model(behavior: ModelBehavior) -> Self {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let assets = AssetStore::open(tmp.path().join("uploads")).expect("Failed to open assets");
        let catalog = CatalogService::new(CatalogStore::memory(), assets);
        let model = Arc::new(FakeModel {
            behavior,
            requests: Mutex::new(Vec::new()),
        });
        let generation =
            GenerationService::new(model.clone(), catalog.clone(), Duration::from_millis(200));
        let router = router(AppState {
            catalog: catalog.clone(),
            generation,
            metrics: None,
        });

        Self {
            router,
            catalog,
            model,
            _tmp: tmp,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<serde_json::Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            },
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::DELETE, uri, Some(body)).await
    }

    /// Generate one image through the API and return its public URL.
    pub async fn generate(&self, content: &str) -> String {
        let resp = self
            .post("/api/generate", serde_json::json!({ "content": content }))
            .await;
        assert_eq!(resp.status, StatusCode::OK, "generate failed: {:?}", resp.json());
        resp.json()["publicUrl"].as_str().unwrap().to_string()
    }
}
