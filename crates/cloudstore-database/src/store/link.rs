//! Public link store.

use async_trait::async_trait;

use cloudstore_core::result::AppResult;
use cloudstore_core::types::{LinkId, UserId};
use cloudstore_entity::resource::ResourceKey;
use cloudstore_entity::share::{CreateLink, PublicLink};

/// Persistence of public links, at most one per resource.
#[async_trait]
pub trait LinkStore: Send + Sync + std::fmt::Debug + 'static {
    /// Atomically drop any existing link for the resource and insert a new one.
    async fn replace(&self, data: &CreateLink) -> AppResult<PublicLink>;

    /// The current link of a resource.
    async fn find_for_resource(&self, resource: ResourceKey) -> AppResult<Option<PublicLink>>;

    /// Look a link up by its token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<PublicLink>>;

    /// All links issued by a user.
    async fn list_by_creator(&self, created_by: UserId) -> AppResult<Vec<PublicLink>>;

    /// Increment the access counter.
    async fn record_access(&self, id: LinkId) -> AppResult<()>;

    /// Delete the resource's link. Returns whether one existed.
    async fn delete_for_resource(&self, resource: ResourceKey) -> AppResult<bool>;
}
