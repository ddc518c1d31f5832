//! Folder handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use super::super::types::{
    CreateFolderRequest, DeleteFolderRequest, FolderResponse, FoldersResponse,
    RenameFolderRequest, SuccessResponse,
};
use super::super::{AppError, AppState, metrics};
use crate::error::Error;

/// GET /api/folders - All folders with image counts, sorted by name.
pub(crate) async fn folder_list(
    State(state): State<AppState>,
) -> Result<Json<FoldersResponse>, AppError> {
    metrics::record_catalog_operation("list_folders");
    let folders = state.catalog.list_folders().await?;
    Ok(Json(FoldersResponse { folders }))
}

/// POST /api/folders - Create a folder.
pub(crate) async fn folder_create(
    State(state): State<AppState>,
    body: Result<Json<CreateFolderRequest>, JsonRejection>,
) -> Result<Json<FolderResponse>, AppError> {
    metrics::record_catalog_operation("create_folder");
    let Json(req) = body?;
    let folder = state.catalog.create_folder(&req.name).await?;
    Ok(Json(FolderResponse { folder }))
}

/// PATCH /api/folders - Rename a folder.
pub(crate) async fn folder_rename(
    State(state): State<AppState>,
    body: Result<Json<RenameFolderRequest>, JsonRejection>,
) -> Result<Json<FolderResponse>, AppError> {
    metrics::record_catalog_operation("rename_folder");
    let Json(req) = body?;
    let folder = state.catalog.rename_folder(&req.id, &req.name).await?;
    Ok(Json(FolderResponse { folder }))
}

/// DELETE /api/folders - Delete a folder; its images lose the membership.
pub(crate) async fn folder_delete(
    State(state): State<AppState>,
    body: Result<Json<DeleteFolderRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    metrics::record_catalog_operation("delete_folder");
    let Json(req) = body?;
    if req.id.trim().is_empty() {
        return Err(Error::validation("id required").into());
    }
    state.catalog.delete_folder(&req.id).await?;
    Ok(Json(SuccessResponse::ok()))
}
