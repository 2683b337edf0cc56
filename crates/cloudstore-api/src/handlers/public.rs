//! Anonymous `/s/{token}` handlers.

use axum::extract::{Path, Query, State};
use uuid::Uuid;

use cloudstore_core::types::FolderId;
use cloudstore_service::drive::DownloadDescriptor;
use cloudstore_service::share::PublicShareView;

use super::{ApiResult, ok};
use crate::dto::DownloadQuery;
use crate::state::AppState;

/// GET /s/{token}
pub async fn view(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<PublicShareView> {
    ok(state.services.public.view(&token).await?)
}

/// GET /s/{token}/folder/{subfolderId}
pub async fn folder(
    State(state): State<AppState>,
    Path((token, subfolder_id)): Path<(String, Uuid)>,
) -> ApiResult<PublicShareView> {
    ok(state
        .services
        .public
        .folder(&token, FolderId::from_uuid(subfolder_id))
        .await?)
}

/// GET /s/{token}/download?fileId=
pub async fn download(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<DownloadDescriptor> {
    ok(state.services.public.download(&token, query.file_id).await?)
}
