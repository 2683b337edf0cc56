//! # cloudstore-service
//!
//! Use cases for CloudStore. Each service orchestrates the stores and the
//! visibility resolver; every check on who may do what goes through
//! [`cloudstore_auth::VisibilityResolver`].
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod drive;
pub mod report;
pub mod services;
pub mod share;
pub mod trash;
pub mod user;

#[cfg(test)]
mod testing;

pub use context::RequestContext;
pub use drive::DriveService;
pub use report::BulkReport;
pub use services::Services;
pub use share::{GrantService, LinkService, PublicShareService};
pub use trash::TrashService;
pub use user::UserService;
