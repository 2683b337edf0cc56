//! Trash, restore, and purge handlers.

use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use cloudstore_entity::resource::Resource;
use cloudstore_service::BulkReport;

use super::{ApiResult, ok};
use crate::dto::MessageResponse;
use crate::extractors::{AuthUser, ResourceKind};
use crate::state::AppState;

/// Body of a successful trash call.
#[derive(Debug, Clone, Serialize)]
pub struct TrashedResponse {
    /// Rows moved to trash, the item included.
    pub trashed: u64,
}

/// DELETE /api/{kind}/{id}
pub async fn trash_item<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<TrashedResponse> {
    let trashed = state.services.trash.trash(&auth, K::key(id)).await?;
    ok(TrashedResponse { trashed })
}

/// POST /api/{kind}/{id}/restore
pub async fn restore<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Resource> {
    ok(state.services.trash.restore(&auth, K::key(id)).await?)
}

/// DELETE /api/{kind}/{id}/permanent
pub async fn purge<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<MessageResponse> {
    state.services.trash.purge(&auth, K::key(id)).await?;
    ok(MessageResponse::new("Permanently deleted"))
}

/// GET /api/trash
pub async fn list_trash(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<Resource>> {
    ok(state.services.trash.list_trash(&auth).await?)
}

/// DELETE /api/trash
pub async fn empty_trash(State(state): State<AppState>, auth: AuthUser) -> ApiResult<BulkReport> {
    ok(state.services.trash.empty_trash(&auth).await?)
}
