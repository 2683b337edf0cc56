//! Sharing domain entities: per-user grants and public links.

pub mod grant;
pub mod link;
pub mod permission;

pub use grant::{AccessGrant, CreateGrant};
pub use link::{CreateLink, PublicLink};
pub use permission::{AccessLevel, SharePermission};
