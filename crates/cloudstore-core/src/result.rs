//! Convenience result type alias for CloudStore.

use crate::error::AppError;

/// A specialized `Result` type for CloudStore operations.
pub type AppResult<T> = Result<T, AppError>;
