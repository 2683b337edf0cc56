//! # cloudstore-database
//!
//! Persistence for CloudStore. The [`store`] module defines the async
//! store traits the rest of the workspace programs against; [`repositories`]
//! implements them on PostgreSQL and [`memory`] implements them in-process.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::{DatabasePool, open_stores};
pub use memory::MemoryStore;
pub use store::{GrantStore, LinkStore, ResourceStore, Stores, UserStore};
