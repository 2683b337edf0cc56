//! Store traits the services program against.
//!
//! Each trait has a PostgreSQL implementation in
//! [`crate::repositories`] and an in-process one in [`crate::memory`].
//! Multi-row mutations (`trash`, `restore`, `purge`, `replace`) are
//! atomic in both backends.

pub mod grant;
pub mod link;
pub mod resource;
pub mod user;

use std::sync::Arc;

use sqlx::PgPool;

use crate::memory::MemoryStore;
use crate::repositories::{GrantRepository, LinkRepository, ResourceRepository, UserRepository};

pub use grant::GrantStore;
pub use link::LinkStore;
pub use resource::{MAX_ANCESTRY_DEPTH, ResourceStore};
pub use user::UserStore;

/// The full set of stores, shared by every service.
#[derive(Debug, Clone)]
pub struct Stores {
    /// User directory.
    pub users: Arc<dyn UserStore>,
    /// Files and folders.
    pub resources: Arc<dyn ResourceStore>,
    /// Per-user access grants.
    pub grants: Arc<dyn GrantStore>,
    /// Public links.
    pub links: Arc<dyn LinkStore>,
}

impl Stores {
    /// Stores backed by a single in-process [`MemoryStore`].
    pub fn memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    /// Stores sharing an existing [`MemoryStore`].
    pub fn from_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            resources: store.clone(),
            grants: store.clone(),
            links: store,
        }
    }

    /// Stores backed by PostgreSQL repositories over one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            resources: Arc::new(ResourceRepository::new(pool.clone())),
            grants: Arc::new(GrantRepository::new(pool.clone())),
            links: Arc::new(LinkRepository::new(pool)),
        }
    }
}
