//! Built-in job handler implementations.

pub mod trash_purge;

pub use trash_purge::TrashPurgeJobHandler;
