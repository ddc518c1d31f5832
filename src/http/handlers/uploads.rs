//! Asset file serving.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::super::audit::{AuditEvent, log_audit_event};
use super::super::{AppError, AppState, metrics};
use crate::assets::guess_content_type;
use crate::constants::ASSET_CACHE_CONTROL;
use crate::error::Error;

/// GET /api/uploads/{*path} - Serve a generated image.
pub(crate) async fn upload_get(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    match state.catalog.assets().read(&path).await {
        Ok(bytes) => {
            metrics::record_asset_fetch("ok");
            let content_type = guess_content_type(std::path::Path::new(&path));
            Ok((
                [
                    (header::CONTENT_TYPE, content_type.into_owned()),
                    (header::CACHE_CONTROL, ASSET_CACHE_CONTROL.to_string()),
                ],
                bytes,
            )
                .into_response())
        },
        Err(e) => {
            let outcome = match &e {
                Error::PathTraversal { .. } => {
                    log_audit_event(AuditEvent::PathTraversalBlocked {
                        route: "/api/uploads",
                        path,
                    });
                    "forbidden"
                },
                Error::NotFound(_) => "not_found",
                _ => "error",
            };
            metrics::record_asset_fetch(outcome);
            Err(e.into())
        },
    }
}
