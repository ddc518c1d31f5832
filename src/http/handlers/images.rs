//! Image catalog handlers.
//!
//! Listing with pagination and folder filter, deletion, and folder
//! membership moves.

use axum::{
    Json,
    extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
};

use super::super::types::{DeleteImageRequest, ListImagesQuery, MoveImagesRequest, SuccessResponse};
use super::super::{AppError, AppState, metrics};
use crate::catalog::{FolderFilter, ImagePage};
use crate::constants::DEFAULT_PAGE_LIMIT;
use crate::error::Error;

/// GET /api/images - One page of images, newest first.
pub(crate) async fn image_list(
    State(state): State<AppState>,
    query: Result<Query<ListImagesQuery>, QueryRejection>,
) -> Result<Json<ImagePage>, AppError> {
    metrics::record_catalog_operation("list_images");
    let Query(query) = query?;
    let filter = FolderFilter::from_query(query.folder_id.as_deref());
    let page = state
        .catalog
        .list_images(
            &filter,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
        .await?;
    Ok(Json(page))
}

/// DELETE /api/images - Delete an image record and its file.
pub(crate) async fn image_delete(
    State(state): State<AppState>,
    body: Result<Json<DeleteImageRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    metrics::record_catalog_operation("delete_image");
    let Json(req) = body?;
    if req.id.trim().is_empty() {
        return Err(Error::validation("id required").into());
    }
    state.catalog.delete_image(&req.id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// PATCH /api/images/move - Add images to, remove them from, or clear folders.
pub(crate) async fn images_move(
    State(state): State<AppState>,
    body: Result<Json<MoveImagesRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    metrics::record_catalog_operation("move_images");
    let Json(req) = body?;
    state
        .catalog
        .move_images(
            &req.image_ids,
            req.folder_id.as_deref(),
            req.action.unwrap_or_default(),
        )
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
