//! Health, presets and metrics endpoints.

use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};

use super::super::types::HealthResponse;
use super::super::{AppError, AppState};
use crate::presets::PresetCatalog;

/// GET /health - Liveness probe.
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/presets - Themes, sizes and genres for UI selectors.
pub(crate) async fn presets() -> Json<PresetCatalog> {
    Json(PresetCatalog::new())
}

/// GET /metrics - Prometheus text exposition.
pub(crate) async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::NotFound("metrics are disabled".to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
