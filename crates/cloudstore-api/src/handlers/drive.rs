//! File and folder handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use cloudstore_core::types::{FileId, FolderId};
use cloudstore_entity::file::File;
use cloudstore_entity::folder::Folder;
use cloudstore_entity::resource::Resource;
use cloudstore_service::BulkReport;
use cloudstore_service::drive::{DownloadDescriptor, FolderContents, ResourceView};

use super::{ApiResult, ok};
use crate::dto::{
    ApiResponse, CreateFileRequest, CreateFolderRequest, MoveItemsRequest, RenameRequest,
    validate_body,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ResourceKind};
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    validate_body(&req)?;
    let folder = state
        .services
        .drive
        .create_folder(&auth, &req.name, req.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// GET /api/folders/root
pub async fn list_root(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<Resource>> {
    ok(state.services.drive.list_root(&auth).await?)
}

/// GET /api/folders/{id}/contents
pub async fn folder_contents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<FolderContents> {
    ok(state
        .services
        .drive
        .list_folder(&auth, FolderId::from_uuid(id))
        .await?)
}

/// GET /api/{kind}/{id}
pub async fn get_item<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<ResourceView> {
    ok(state.services.drive.get(&auth, K::key(id)).await?)
}

/// POST /api/{kind}/{id}/star
pub async fn toggle_star<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Resource> {
    ok(state.services.drive.toggle_star(&auth, K::key(id)).await?)
}

/// GET /api/starred
pub async fn starred(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<Resource>> {
    ok(state.services.drive.starred(&auth).await?)
}

/// PATCH /api/{kind}/{id}
pub async fn rename<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> ApiResult<Resource> {
    validate_body(&req)?;
    ok(state
        .services
        .drive
        .rename(&auth, K::key(id), &req.name)
        .await?)
}

/// POST /api/files
pub async fn create_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<File>>), ApiError> {
    validate_body(&req)?;
    let file = state.services.drive.create_file(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<DownloadDescriptor> {
    ok(state
        .services
        .drive
        .download(&auth, FileId::from_uuid(id))
        .await?)
}

/// POST /api/items/move
pub async fn move_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MoveItemsRequest>,
) -> ApiResult<BulkReport> {
    validate_body(&req)?;
    ok(state
        .services
        .drive
        .move_items(&auth, &req.items, req.target_folder_id)
        .await?)
}
