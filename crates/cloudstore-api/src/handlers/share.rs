//! Per-user grant handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use cloudstore_core::types::GrantId;
use cloudstore_entity::share::AccessGrant;
use cloudstore_service::share::{
    RemoveAllOutcome, ShareRequest, SharedByMeEntry, SharedWithMeEntry,
};

use super::{ApiResult, ok};
use crate::dto::{
    ApiResponse, MessageResponse, ShareBody, ShareOutcome, UpdateGrantRequest, validate_body,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ResourceKind};
use crate::state::AppState;

/// POST /api/{kind}/{id}/share
///
/// Creates the grant (201) or updates the existing grant's permission (200).
pub async fn share<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ShareBody>,
) -> Result<(StatusCode, Json<ApiResponse<ShareOutcome>>), ApiError> {
    validate_body(&body)?;
    let req: ShareRequest = body.into();
    let (share, created) = state
        .services
        .grants
        .share_or_update(&auth, K::key(id), &req)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::ok(ShareOutcome { share, created }))))
}

/// GET /api/{kind}/{id}/shares
pub async fn list_shares<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<AccessGrant>> {
    ok(state
        .services
        .grants
        .list_for_resource(&auth, K::key(id))
        .await?)
}

/// PATCH /api/{kind}/{id}/shares/{shareId}
pub async fn update_share<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, share_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateGrantRequest>,
) -> ApiResult<AccessGrant> {
    ok(state
        .services
        .grants
        .update_permission(&auth, K::key(id), GrantId::from_uuid(share_id), body.permission)
        .await?)
}

/// DELETE /api/{kind}/{id}/shares/{shareId}
pub async fn revoke_share<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, share_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<MessageResponse> {
    state
        .services
        .grants
        .revoke(&auth, K::key(id), GrantId::from_uuid(share_id))
        .await?;
    ok(MessageResponse::new("Share revoked"))
}

/// DELETE /api/{kind}/{id}/shares/all
///
/// Drops every grant and the public link, then moves the item to trash.
pub async fn remove_all<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<RemoveAllOutcome> {
    ok(state.services.grants.remove_all(&auth, K::key(id)).await?)
}

/// DELETE /api/{kind}/{id}/shares/me
pub async fn leave_share<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<MessageResponse> {
    state.services.grants.remove_self(&auth, K::key(id)).await?;
    ok(MessageResponse::new("You no longer have access to this item"))
}

/// POST /api/{kind}/{id}/star-shared
///
/// Toggles the caller's own star on a resource shared with them.
pub async fn toggle_shared_star<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<AccessGrant> {
    ok(state.services.grants.toggle_star(&auth, K::key(id)).await?)
}

/// GET /api/shares/with-me
pub async fn shared_with_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<SharedWithMeEntry>> {
    ok(state.services.grants.shared_with_me(&auth).await?)
}

/// GET /api/shares/by-me
pub async fn shared_by_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Vec<SharedByMeEntry>> {
    ok(state.services.grants.shared_by_me(&auth).await?)
}
