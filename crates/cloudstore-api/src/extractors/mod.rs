//! Custom Axum extractors.

pub mod auth;
pub mod kind;

pub use auth::AuthUser;
pub use kind::{FileKind, FolderKind, ResourceKind};
