//! Public link management handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use cloudstore_service::share::LinkView;

use super::{ApiResult, ok};
use crate::dto::{CreateLinkRequest, MessageResponse};
use crate::extractors::{AuthUser, ResourceKind};
use crate::state::AppState;

/// POST /api/{kind}/{id}/share-link
///
/// Issues a new token; any previous token for the item stops resolving.
pub async fn create_link<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateLinkRequest>,
) -> ApiResult<LinkView> {
    ok(state
        .services
        .links
        .create(&auth, K::key(id), body.permission, body.expires_in)
        .await?)
}

/// GET /api/{kind}/{id}/share-link
pub async fn get_link<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Option<LinkView>> {
    ok(state.services.links.get(&auth, K::key(id)).await?)
}

/// DELETE /api/{kind}/{id}/share-link
pub async fn revoke_link<K: ResourceKind>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<MessageResponse> {
    state.services.links.revoke(&auth, K::key(id)).await?;
    ok(MessageResponse::new("Share link revoked"))
}
