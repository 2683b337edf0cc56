//! # cloudstore-entity
//!
//! Domain entity models for CloudStore. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! JSON field names are camelCase to match the web client's contract.

pub mod file;
pub mod folder;
pub mod resource;
pub mod share;
pub mod user;

pub use file::{CreateFile, File};
pub use folder::{CreateFolder, Folder};
pub use resource::{Resource, ResourceKey, ResourceType};
pub use share::{AccessGrant, AccessLevel, CreateGrant, CreateLink, PublicLink, SharePermission};
pub use user::{CreateUser, User};
