//! Current-user handler.

use axum::extract::State;

use cloudstore_service::user::UserSummary;

use super::{ApiResult, ok};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<UserSummary> {
    let user = state.services.users.me(&auth).await?;
    ok(UserSummary::from(user))
}
