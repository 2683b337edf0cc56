//! Request handlers, grouped by domain.

pub mod drive;
pub mod health;
pub mod link;
pub mod public;
pub mod share;
pub mod trash;
pub mod user;

use axum::Json;

use crate::dto::ApiResponse;
use crate::error::ApiError;

/// Enveloped JSON result of most handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wraps `data` in the success envelope.
pub fn ok<T: serde::Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}
