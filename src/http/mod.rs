//! HTTP API.
//!
//! Routes:
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/api/generate` | generate a memo image |
//! | POST | `/api/edit` | edit an existing image |
//! | GET, DELETE | `/api/images` | list (paginated) / delete images |
//! | PATCH | `/api/images/move` | change folder membership |
//! | GET, POST, PATCH, DELETE | `/api/folders` | folder CRUD |
//! | GET | `/api/uploads/{*path}` | serve image files |
//! | GET | `/api/presets` | themes, sizes, genres |
//! | GET | `/health` | liveness |
//! | GET | `/metrics` | Prometheus (when enabled) |

mod audit;
mod error;
mod handlers;
pub mod metrics;
mod types;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, patch, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub(crate) use error::AppError;

use crate::catalog::CatalogService;
use crate::constants::MAX_BODY_BYTES;
use crate::generation::GenerationService;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub generation: GenerationService,
    /// Present when the Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let mut router = Router::new()
        .route("/api/generate", post(handlers::generate))
        .route("/api/edit", post(handlers::edit))
        .route(
            "/api/images",
            get(handlers::image_list).delete(handlers::image_delete),
        )
        .route("/api/images/move", patch(handlers::images_move))
        .route(
            "/api/folders",
            get(handlers::folder_list)
                .post(handlers::folder_create)
                .patch(handlers::folder_rename)
                .delete(handlers::folder_delete),
        )
        .route("/api/uploads/{*path}", get(handlers::upload_get))
        .route("/api/presets", get(handlers::presets))
        .route("/health", get(handlers::health));

    if state.metrics.is_some() {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
