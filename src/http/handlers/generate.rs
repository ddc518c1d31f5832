//! Generation and edit handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use super::super::audit::{AuditEvent, log_audit_event};
use super::super::{AppError, AppState, metrics};
use crate::error::{Error, Result};
use crate::generation::{EditRequest, GenerateRequest, GeneratedImage};

/// POST /api/generate - Generate a memo image from text.
pub(crate) async fn generate(
    State(state): State<AppState>,
    body: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> std::result::Result<Json<GeneratedImage>, AppError> {
    let Json(req) = body?;
    let result = state.generation.generate(req).await;
    finish("generate", "/api/generate", result)
}

/// POST /api/edit - Edit an existing image with an instruction.
pub(crate) async fn edit(
    State(state): State<AppState>,
    body: std::result::Result<Json<EditRequest>, JsonRejection>,
) -> std::result::Result<Json<GeneratedImage>, AppError> {
    let Json(req) = body?;
    let path = req.storage_path.clone();
    let result = state.generation.edit(req).await;
    if matches!(result, Err(Error::PathTraversal { .. })) {
        log_audit_event(AuditEvent::PathTraversalBlocked {
            route: "/api/edit",
            path,
        });
    }
    finish("edit", "/api/edit", result)
}

fn finish(
    mode: &'static str,
    route: &'static str,
    result: Result<GeneratedImage>,
) -> std::result::Result<Json<GeneratedImage>, AppError> {
    metrics::record_generation(mode, outcome(&result));
    match result {
        Ok(image) => Ok(Json(image)),
        Err(Error::Timeout { timeout_secs }) => {
            log_audit_event(AuditEvent::GenerationTimeout {
                route,
                timeout_secs,
            });
            Err(Error::Timeout { timeout_secs }.into())
        },
        Err(e) => Err(e.into()),
    }
}

fn outcome(result: &Result<GeneratedImage>) -> &'static str {
    match result {
        Ok(image) if image.public_url.is_some() => "ok",
        Ok(_) => "unrecorded",
        Err(Error::Validation(_)) => "invalid",
        Err(Error::NotFound(_)) => "not_found",
        Err(Error::PathTraversal { .. }) => "forbidden",
        Err(Error::Generation(_)) => "no_image",
        Err(Error::Timeout { .. }) => "timeout",
        Err(Error::Upstream(_)) => "upstream",
        Err(_) => "error",
    }
}
