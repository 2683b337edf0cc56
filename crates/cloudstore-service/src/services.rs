//! Wiring of every service over one set of stores.

use std::sync::Arc;

use cloudstore_auth::visibility::VisibilityResolver;
use cloudstore_core::config::{SharingConfig, TrashConfig};
use cloudstore_database::store::Stores;

use crate::drive::DriveService;
use crate::share::{GrantService, LinkService, PublicShareService};
use crate::trash::TrashService;
use crate::user::UserService;

/// All services, sharing one resolver.
#[derive(Debug, Clone)]
pub struct Services {
    /// The stores the services run against.
    pub stores: Stores,
    /// Access checks.
    pub resolver: Arc<VisibilityResolver>,
    /// User directory.
    pub users: Arc<UserService>,
    /// Files and folders.
    pub drive: Arc<DriveService>,
    /// Trash lifecycle.
    pub trash: Arc<TrashService>,
    /// Per-user grants.
    pub grants: Arc<GrantService>,
    /// Public links.
    pub links: Arc<LinkService>,
    /// Anonymous link access.
    pub public: Arc<PublicShareService>,
}

impl Services {
    /// Builds the service graph.
    pub fn new(stores: Stores, sharing: SharingConfig, trash: TrashConfig) -> Self {
        let resolver = Arc::new(VisibilityResolver::new(
            stores.resources.clone(),
            stores.grants.clone(),
        ));

        let users = Arc::new(UserService::new(stores.users.clone()));
        let drive = Arc::new(DriveService::new(
            stores.resources.clone(),
            resolver.clone(),
        ));
        let trash = Arc::new(TrashService::new(
            stores.resources.clone(),
            resolver.clone(),
            trash,
        ));
        let links = Arc::new(LinkService::new(
            stores.links.clone(),
            resolver.clone(),
            sharing,
        ));
        let grants = Arc::new(GrantService::new(
            stores.users.clone(),
            stores.grants.clone(),
            stores.links.clone(),
            resolver.clone(),
            links.clone(),
            trash.clone(),
        ));
        let public = Arc::new(PublicShareService::new(
            links.clone(),
            resolver.clone(),
            users.clone(),
        ));

        Self {
            stores,
            resolver,
            users,
            drive,
            trash,
            grants,
            links,
            public,
        }
    }

    /// Services over a fresh in-memory store with default settings.
    pub fn in_memory() -> Self {
        Self::new(
            Stores::memory(),
            SharingConfig::default(),
            TrashConfig::default(),
        )
    }
}
