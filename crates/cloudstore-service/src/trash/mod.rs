//! Trash lifecycle: `active -> trashed -> purged`, and `trashed -> active`.

pub mod service;

pub use service::TrashService;
